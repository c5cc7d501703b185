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

//! Durable endpoint storage
//!
//! Records which management endpoint this node paired with. Last write
//! wins; other subsystems read the record back on their own.

use anyhow::Result;
use std::path::PathBuf;

/// Trait for durably recording the paired management endpoint
pub trait EndpointStore: Send + Sync {
    /// Overwrite the recorded endpoint address
    fn record_endpoint(&self, address: &str) -> Result<()>;

    /// Read the recorded endpoint address
    /// Returns Ok(Some(address)) if recorded, Ok(None) if never paired
    fn endpoint(&self) -> Result<Option<String>>;
}

/// Default filesystem-based implementation of EndpointStore
pub struct FileStore {
    storage_dir: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: path.into(),
        }
    }

    fn endpoint_path(&self) -> PathBuf {
        self.storage_dir.join("endpoint")
    }
}

impl EndpointStore for FileStore {
    fn record_endpoint(&self, address: &str) -> Result<()> {
        std::fs::create_dir_all(&self.storage_dir)?;
        std::fs::write(self.endpoint_path(), address)?;
        Ok(())
    }

    fn endpoint(&self) -> Result<Option<String>> {
        let path = self.endpoint_path();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }
}
