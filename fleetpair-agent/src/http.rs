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

//! HTTPS client construction

use crate::HTTP_TIMEOUT;

/// Build a client for a management call.
///
/// Clients are built per call: the insecure-TLS flag is read from live
/// configuration each time. Management servers commonly run self-signed
/// certificates, hence the optional validation bypass.
///
/// # Errors
///
/// Returns a `reqwest` error if the TLS backend cannot be initialized.
pub fn client(allow_insecure: bool) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .danger_accept_invalid_certs(allow_insecure)
        .build()
}
