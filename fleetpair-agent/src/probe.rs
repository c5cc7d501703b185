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

//! Local identity probe
//!
//! Asks the locally hosted management service for its fingerprint. The
//! advertiser uses the answer both as the advertised device id and as its
//! exit condition: an empty identity means the local management role is
//! gone and advertising should stop.

use crate::config::ConfigHandle;
use crate::{http, MANAGEMENT_ADDR};
use tracing::warn;

/// URL answering with the local management fingerprint
pub fn identity_url() -> String {
    format!("https://{MANAGEMENT_ADDR}:8443/rest/v1/security/keyman/getpublickeyfingerprint")
}

/// Fetch the local management fingerprint.
///
/// Returns the response body on HTTP 200 and an empty string on any
/// failure. Callers treat empty as "no identity yet" or "identity
/// cleared"; nothing here is fatal.
pub async fn management_fingerprint(config: &ConfigHandle) -> String {
    let client = match http::client(config.allow_insecure().await) {
        Ok(client) => client,
        Err(e) => {
            warn!("Getting management fingerprint: {e}");
            return String::new();
        }
    };
    fetch_identity(&client, &identity_url()).await
}

/// Inner fetch, URL-agnostic for testability
pub async fn fetch_identity(client: &reqwest::Client, url: &str) -> String {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Getting management fingerprint: {e}");
            return String::new();
        }
    };

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        warn!("Failed to fetch fingerprint from management server. Status code {status}");
        return String::new();
    }

    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Reading management fingerprint: {e}");
            String::new()
        }
    }
}
