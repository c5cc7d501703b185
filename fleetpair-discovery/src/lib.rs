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

//! Fleetpair Management-Endpoint Discovery
//!
//! This crate provides traits and types for locating the management endpoint
//! a fleet node reports to. It defines the core abstractions without being
//! tied to a specific discovery transport.
//!
//! ## Architecture
//!
//! - **Core traits**: `DiscoveryResponder` and `DiscoveryClient` for
//!   advertising the management endpoint and searching for it
//! - **Common types**: `Advertisement`, `Announcement`
//! - **Selection policy**: `should_accept` decides which announced endpoint
//!   a node pairs with, based on its configured fingerprint and host
//! - **Pluggable backends**: implementations live in separate crates
//!   (`fleetpair-discovery-ssdp` for the wire protocol,
//!   `fleetpair-discovery-mock` for tests)
//!
//! ## Trust Model
//!
//! Discovery carries the management server's **claimed fingerprint**, but
//! does NOT verify it. The key exchange that follows pairing fetches the
//! server's public key over HTTPS and imports it into the local keyring;
//! all later traffic to the endpoint is secured with that key.

pub mod client;
pub mod error;
pub mod policy;
pub mod responder;
pub mod types;

pub use client::DiscoveryClient;
pub use error::DiscoveryError;
pub use policy::should_accept;
pub use responder::DiscoveryResponder;
pub use types::{Advertisement, Announcement, MANAGEMENT_SERVICE_TYPE};

/// Factory for per-cycle discovery sessions.
///
/// The role monitor opens a fresh responder or client every cycle rather
/// than reusing one, so backends are constructed through this factory.
/// Construction failure is non-fatal to callers (logged and retried on the
/// next cycle).
pub trait DiscoveryBackend: Send + Sync {
    /// Open a responder session for advertising.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ResponderFailed` if the underlying
    /// transport cannot be initialized.
    fn responder(&self) -> Result<Box<dyn DiscoveryResponder>, DiscoveryError>;

    /// Open a client session for searching.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::SearchFailed` if the underlying transport
    /// cannot be initialized.
    fn client(&self) -> Result<Box<dyn DiscoveryClient>, DiscoveryError>;
}
