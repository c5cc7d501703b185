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

//! Fleetpair Agent
//!
//! The management-endpoint discovery and pairing subsystem of a fleet node.
//! Every 30 seconds the role monitor inspects local workload state: a node
//! hosting the management workload pairs with itself and advertises over
//! multicast discovery; any other node listens briefly for advertisements,
//! runs each one through the selection policy, and on acceptance persists
//! the endpoint and fetches its public key into the local keyring.
//!
//! Pairing is last-write-wins: at most one endpoint is paired at any time.
//!
//! All network operations here are best-effort. Failures are logged and the
//! operation yields absence (an empty identity, a missing key); recovery is
//! always "let the next monitor cycle try again".

pub mod agent;
pub mod config;
pub mod http;
pub mod keyring;
pub mod keys;
pub mod net;
pub mod pairing;
pub mod probe;
pub mod runtime;
pub mod store;

pub use agent::Agent;
pub use config::{ConfigHandle, ManagementConfig};

use std::time::Duration;

/// Address the management service answers on when it runs locally
pub const MANAGEMENT_ADDR: &str = "10.10.10.1";

/// Name of the management workload in the local container runtime
pub const MANAGEMENT_WORKLOAD: &str = "management";

/// Role monitor cadence, also the advertiser's identity-poll interval
pub const MONITOR_INTERVAL: Duration = Duration::from_secs(30);

/// How long the listener waits for announcements
pub const LISTEN_WINDOW: Duration = Duration::from_secs(2);

/// Timeout for every outbound HTTPS call
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Advertisement TTL in seconds
pub const ADVERTISEMENT_MAX_AGE: u32 = 3600;

/// A configured host at or below this length is treated as an unpaired
/// placeholder; the listener only skips its window for longer values.
pub const HOST_PLACEHOLDER_LEN: usize = 6;
