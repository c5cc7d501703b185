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

//! Live management configuration
//!
//! A shared handle to the node's current view of its management endpoint.
//! Writer discipline: the pairing persister writes `host`, the key exchange
//! writes `gpg_user`; everything else only reads. The lock makes torn
//! values impossible; overlapping roles may still observe stale reads,
//! which the design tolerates.

use std::sync::Arc;
use tokio::sync::RwLock;

/// Connection settings for the management endpoint
#[derive(Debug, Clone, Default)]
pub struct ManagementConfig {
    /// Expected fingerprint of the management endpoint; empty to accept any
    pub fingerprint: String,

    /// Paired endpoint address; empty or placeholder while unpaired
    pub host: String,

    /// Management REST port
    pub port: String,

    /// Path of the public-key endpoint on the management server
    pub public_key_path: String,

    /// Skip TLS certificate validation on management calls
    pub allow_insecure: bool,

    /// Key identifier of the imported management public key
    pub gpg_user: String,
}

impl ManagementConfig {
    /// Configuration with standard port and public-key path
    pub fn standard() -> Self {
        Self {
            port: "8443".to_string(),
            public_key_path: "/rest/v1/security/keyman/getpublickey".to_string(),
            ..Self::default()
        }
    }
}

/// Cloneable handle to the shared live configuration
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<ManagementConfig>>,
}

impl ConfigHandle {
    /// Wrap an initial configuration
    pub fn new(config: ManagementConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Snapshot of the whole configuration
    pub async fn snapshot(&self) -> ManagementConfig {
        self.inner.read().await.clone()
    }

    /// Currently configured endpoint fingerprint
    pub async fn fingerprint(&self) -> String {
        self.inner.read().await.fingerprint.clone()
    }

    /// Currently paired endpoint address
    pub async fn host(&self) -> String {
        self.inner.read().await.host.clone()
    }

    /// Currently recorded management key identifier
    pub async fn gpg_user(&self) -> String {
        self.inner.read().await.gpg_user.clone()
    }

    /// Whether management calls skip certificate validation
    pub async fn allow_insecure(&self) -> bool {
        self.inner.read().await.allow_insecure
    }

    /// Record a newly paired endpoint address (pairing persister only)
    pub async fn set_host(&self, host: &str) {
        self.inner.write().await.host = host.to_string();
    }

    /// Record the imported key identifier (key exchange only)
    pub async fn set_gpg_user(&self, key_id: &str) {
        self.inner.write().await.gpg_user = key_id.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn field_writes_are_isolated() {
        let config = ConfigHandle::new(ManagementConfig {
            fingerprint: "fp".to_string(),
            ..ManagementConfig::standard()
        });

        config.set_host("10.0.0.5").await;
        config.set_gpg_user("key-id").await;

        let snapshot = config.snapshot().await;
        assert_eq!(snapshot.fingerprint, "fp");
        assert_eq!(snapshot.host, "10.0.0.5");
        assert_eq!(snapshot.gpg_user, "key-id");
        assert_eq!(snapshot.port, "8443");
    }
}
