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

//! Endpoint selection policy
//!
//! Decides whether a node pairs with an announced management endpoint.
//! The configured fingerprint and host pin the acceptable endpoint; with
//! neither configured, the first announcement seen wins.

use crate::Announcement;

/// Case-insensitive comparison of trimmed values
fn matches(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Decide whether to pair with `candidate`.
///
/// Exactly one branch applies per evaluation:
///
/// 1. Fingerprint and host both configured: both must match.
/// 2. Only fingerprint configured: device id must match.
/// 3. Only host configured: location must match.
/// 4. Neither configured: accept unconditionally.
///
/// All comparisons are whitespace-trimmed and case-insensitive.
pub fn should_accept(candidate: &Announcement, fingerprint: &str, host: &str) -> bool {
    let fingerprint = fingerprint.trim();
    let host = host.trim();

    if !fingerprint.is_empty() && !host.is_empty() {
        matches(&candidate.device_id, fingerprint) && matches(&candidate.location, host)
    } else if !fingerprint.is_empty() {
        matches(&candidate.device_id, fingerprint)
    } else if !host.is_empty() {
        matches(&candidate.location, host)
    } else {
        true
    }
}
