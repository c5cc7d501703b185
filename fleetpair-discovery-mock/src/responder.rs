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

//! Mock discovery responder implementation

use crate::backend::MockBackend;
use async_trait::async_trait;
use fleetpair_discovery::{Advertisement, Announcement, DiscoveryError, DiscoveryResponder};

/// Mock implementation of DiscoveryResponder
///
/// Registers advertisements in an in-memory backend shared with
/// `MockClient` instances.
pub struct MockResponder {
    backend: MockBackend,
    device_id: Option<String>,
}

impl MockResponder {
    /// Create a new mock responder
    pub fn new(backend: MockBackend) -> Self {
        Self {
            backend,
            device_id: None,
        }
    }
}

#[async_trait]
impl DiscoveryResponder for MockResponder {
    async fn advertise(&mut self, ad: Advertisement) -> Result<(), DiscoveryError> {
        let announcement = Announcement {
            location: ad.location,
            device_id: ad.device_id.clone(),
            service_type: ad.service_type,
        };
        self.backend.advertise(announcement).await;
        self.device_id = Some(ad.device_id);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), DiscoveryError> {
        if let Some(device_id) = self.device_id.take() {
            self.backend.withdraw(&device_id).await;
        }
        Ok(())
    }
}
