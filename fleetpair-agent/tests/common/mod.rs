// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shared test collaborators

use anyhow::Result;
use async_trait::async_trait;
use fleetpair_agent::keyring::Keyring;
use fleetpair_agent::pairing::DependentClient;
use fleetpair_agent::runtime::WorkloadState;
use fleetpair_agent::store::EndpointStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory endpoint store
#[derive(Default)]
pub struct MemoryStore {
    recorded: Mutex<Option<String>>,
}

impl EndpointStore for MemoryStore {
    fn record_endpoint(&self, address: &str) -> Result<()> {
        *self.recorded.lock().unwrap() = Some(address.to_string());
        Ok(())
    }

    fn endpoint(&self) -> Result<Option<String>> {
        Ok(self.recorded.lock().unwrap().clone())
    }
}

/// Counts dependent-client resets
#[derive(Default)]
pub struct CountingReset {
    pub count: AtomicUsize,
}

impl CountingReset {
    pub fn resets(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl DependentClient for CountingReset {
    fn reset(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Keyring recording imported key material
#[derive(Default)]
pub struct RecordingKeyring {
    pub imported: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl Keyring for RecordingKeyring {
    async fn import(&self, key: &[u8]) -> Result<()> {
        self.imported.lock().unwrap().push(key.to_vec());
        Ok(())
    }

    async fn key_id(&self, key: &[u8]) -> Result<String> {
        Ok(format!("id-of-{}", key.len()))
    }
}

/// Workload state with a fixed answer
pub struct FixedWorkload(pub bool);

#[async_trait]
impl WorkloadState for FixedWorkload {
    async fn is_running(&self, _workload: &str) -> bool {
        self.0
    }
}
