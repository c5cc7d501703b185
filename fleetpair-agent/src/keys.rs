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

//! Key exchange with the paired management endpoint
//!
//! Fetches the endpoint's public key over HTTPS and imports it into the
//! local keyring, recording the derived key identifier in configuration so
//! later messages to the endpoint can be encrypted to it. Single attempt,
//! absence on failure; the caller decides when to try again.

use crate::config::ConfigHandle;
use crate::http;
use crate::keyring::Keyring;
use tracing::warn;

/// Public-key URL for the currently configured endpoint
pub async fn public_key_url(config: &ConfigHandle) -> String {
    let snapshot = config.snapshot().await;
    format!(
        "https://{}:{}{}",
        snapshot.host, snapshot.port, snapshot.public_key_path
    )
}

/// Fetch the paired endpoint's public key.
///
/// Returns the raw key bytes on HTTP 200, `None` on any other outcome.
pub async fn fetch_public_key(config: &ConfigHandle) -> Option<Vec<u8>> {
    let client = match http::client(config.allow_insecure().await) {
        Ok(client) => client,
        Err(e) => {
            warn!("Getting management public key: {e}");
            return None;
        }
    };
    fetch_key(&client, &public_key_url(config).await).await
}

/// Inner fetch, URL-agnostic for testability
pub async fn fetch_key(client: &reqwest::Client, url: &str) -> Option<Vec<u8>> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Getting management public key: {e}");
            return None;
        }
    };

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        warn!("Failed to fetch public key from management server. Status code {status}");
        return None;
    }

    match response.bytes().await {
        Ok(body) => Some(body.to_vec()),
        Err(e) => {
            warn!("Reading management public key: {e}");
            None
        }
    }
}

/// Import the paired endpoint's identity.
///
/// If a key is returned, hands it to the keyring and records the derived
/// key identifier in configuration. If no key is returned, configuration
/// stays untouched.
pub async fn import_management_key(config: &ConfigHandle, keyring: &dyn Keyring) {
    let Some(key) = fetch_public_key(config).await else {
        return;
    };
    import_identity(config, keyring, &key).await;
}

/// Import already-fetched key material
pub async fn import_identity(config: &ConfigHandle, keyring: &dyn Keyring, key: &[u8]) {
    if let Err(e) = keyring.import(key).await {
        warn!("Importing management public key: {e}");
        return;
    }
    match keyring.key_id(key).await {
        Ok(key_id) => config.set_gpg_user(&key_id).await,
        Err(e) => warn!("Deriving management key id: {e}"),
    }
}
