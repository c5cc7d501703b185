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

//! Mock implementation of fleetpair discovery for testing
//!
//! This crate provides in-memory implementations of the discovery traits,
//! useful for testing pairing logic without actual multicast networking.
//!
//! # Example
//!
//! ```
//! use fleetpair_discovery::{
//!     Advertisement, DiscoveryClient, DiscoveryResponder, MANAGEMENT_SERVICE_TYPE,
//! };
//! use fleetpair_discovery_mock::{MockBackend, MockClient, MockResponder};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Responder and client share the same in-memory backend
//! let backend = MockBackend::new();
//! let mut responder = MockResponder::new(backend.clone());
//! let mut client = MockClient::new(backend.clone());
//!
//! responder
//!     .advertise(Advertisement {
//!         service_type: MANAGEMENT_SERVICE_TYPE.to_string(),
//!         device_id: "fp-A".to_string(),
//!         location: "10.10.10.1".to_string(),
//!         max_age: 3600,
//!     })
//!     .await?;
//!
//! client.search(MANAGEMENT_SERVICE_TYPE).await?;
//! let announcement = client.responses().next().await.unwrap();
//! assert_eq!(announcement.location, "10.10.10.1");
//! # Ok(())
//! # }
//! ```

mod backend;
mod client;
mod responder;

pub use backend::MockBackend;
pub use client::MockClient;
pub use responder::MockResponder;

use fleetpair_discovery::{DiscoveryBackend, DiscoveryClient, DiscoveryError, DiscoveryResponder};
use std::sync::atomic::{AtomicBool, Ordering};

/// Discovery backend factory producing mock sessions over a shared
/// [`MockBackend`], with injectable initialization failure.
pub struct MockDiscovery {
    backend: MockBackend,
    fail_init: AtomicBool,
}

impl MockDiscovery {
    /// Create a factory over the given shared backend
    pub fn new(backend: MockBackend) -> Self {
        Self {
            backend,
            fail_init: AtomicBool::new(false),
        }
    }

    /// Make subsequent session creation fail, to exercise the non-fatal
    /// initialization-failure paths
    pub fn set_fail_init(&self, fail: bool) {
        self.fail_init.store(fail, Ordering::SeqCst);
    }

    /// The shared backend, for assertions
    pub fn backend(&self) -> &MockBackend {
        &self.backend
    }
}

impl DiscoveryBackend for MockDiscovery {
    fn responder(&self) -> Result<Box<dyn DiscoveryResponder>, DiscoveryError> {
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(DiscoveryError::ResponderFailed(
                "injected init failure".to_string(),
            ));
        }
        Ok(Box::new(MockResponder::new(self.backend.clone())))
    }

    fn client(&self) -> Result<Box<dyn DiscoveryClient>, DiscoveryError> {
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(DiscoveryError::SearchFailed(
                "injected init failure".to_string(),
            ));
        }
        Ok(Box::new(MockClient::new(self.backend.clone())))
    }
}
