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

//! Pairing persistence
//!
//! Durably records an accepted management endpoint, then updates live
//! configuration and resets dependent clients. The store write comes
//! first: if it fails, configuration is left untouched so durable and
//! live state never diverge.

use crate::config::ConfigHandle;
use crate::store::EndpointStore;
use tracing::{info, warn};

/// Client whose connection derives from the paired endpoint and must be
/// rebuilt when it changes (e.g. a metrics pipeline)
pub trait DependentClient: Send + Sync {
    /// Drop any connection state tied to the previous endpoint
    fn reset(&self);
}

/// Persist a newly accepted endpoint address.
///
/// Returns whether the pairing took effect. On store failure the
/// operation aborts before any configuration mutation.
pub async fn persist_endpoint(
    store: &dyn EndpointStore,
    config: &ConfigHandle,
    dependents: &dyn DependentClient,
    address: &str,
) -> bool {
    if let Err(e) = store.record_endpoint(address) {
        warn!("Recording endpoint {address}: {e}");
        return false;
    }

    config.set_host(address).await;
    dependents.reset();
    info!("Paired with management endpoint {address}");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ManagementConfig;
    use anyhow::{bail, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub(crate) struct MemoryStore {
        recorded: Mutex<Option<String>>,
    }

    impl MemoryStore {
        pub(crate) fn new() -> Self {
            Self {
                recorded: Mutex::new(None),
            }
        }
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

    struct FailStore;

    impl EndpointStore for FailStore {
        fn record_endpoint(&self, _address: &str) -> Result<()> {
            bail!("store unavailable");
        }

        fn endpoint(&self) -> Result<Option<String>> {
            bail!("store unavailable");
        }
    }

    pub(crate) struct CountingReset(pub(crate) AtomicUsize);

    impl CountingReset {
        pub(crate) fn new() -> Self {
            Self(AtomicUsize::new(0))
        }
    }

    impl DependentClient for CountingReset {
        fn reset(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn success_updates_store_config_and_dependents() {
        let store = MemoryStore::new();
        let config = ConfigHandle::new(ManagementConfig::standard());
        let reset = CountingReset::new();

        assert!(persist_endpoint(&store, &config, &reset, "10.10.10.1").await);

        assert_eq!(store.endpoint().unwrap().as_deref(), Some("10.10.10.1"));
        assert_eq!(config.host().await, "10.10.10.1");
        assert_eq!(reset.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn store_failure_leaves_config_untouched() {
        let config = ConfigHandle::new(ManagementConfig {
            host: "old-host".to_string(),
            ..ManagementConfig::standard()
        });
        let reset = CountingReset::new();

        assert!(!persist_endpoint(&FailStore, &config, &reset, "10.10.10.1").await);

        assert_eq!(config.host().await, "old-host");
        assert_eq!(reset.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn repairing_overwrites() {
        let store = MemoryStore::new();
        let config = ConfigHandle::new(ManagementConfig::standard());
        let reset = CountingReset::new();

        assert!(persist_endpoint(&store, &config, &reset, "10.0.0.1").await);
        assert!(persist_endpoint(&store, &config, &reset, "10.0.0.2").await);

        assert_eq!(store.endpoint().unwrap().as_deref(), Some("10.0.0.2"));
        assert_eq!(config.host().await, "10.0.0.2");
    }
}
