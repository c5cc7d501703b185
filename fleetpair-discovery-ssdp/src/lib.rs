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

//! SSDP-style implementation of fleetpair discovery
//!
//! This crate provides production implementations of the discovery traits
//! over a UDP multicast exchange modeled on SSDP: the responder answers
//! `M-SEARCH` datagrams for the management service type, the client sends a
//! search and collects `200 OK` / `NOTIFY ssdp:alive` answers.
//!
//! # Example
//!
//! ```no_run
//! use fleetpair_discovery::{Advertisement, DiscoveryResponder, MANAGEMENT_SERVICE_TYPE};
//! use fleetpair_discovery_ssdp::SsdpResponder;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut responder = SsdpResponder::new()?;
//! responder
//!     .advertise(Advertisement {
//!         service_type: MANAGEMENT_SERVICE_TYPE.to_string(),
//!         device_id: "fp-local".to_string(),
//!         location: "10.10.10.1".to_string(),
//!         max_age: 3600,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod message;
mod responder;

pub use client::SsdpClient;
pub use responder::SsdpResponder;

use fleetpair_discovery::{DiscoveryBackend, DiscoveryClient, DiscoveryError, DiscoveryResponder};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// SSDP multicast group
pub const SSDP_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);

/// SSDP port
pub const SSDP_PORT: u16 = 1900;

/// Multicast destination for searches and alive announcements
pub fn multicast_addr() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(SSDP_GROUP, SSDP_PORT))
}

/// Discovery backend producing SSDP sessions on the standard group and port
#[derive(Debug, Clone, Default)]
pub struct SsdpDiscovery;

impl DiscoveryBackend for SsdpDiscovery {
    fn responder(&self) -> Result<Box<dyn DiscoveryResponder>, DiscoveryError> {
        Ok(Box::new(SsdpResponder::new()?))
    }

    fn client(&self) -> Result<Box<dyn DiscoveryClient>, DiscoveryError> {
        Ok(Box::new(SsdpClient::new()?))
    }
}
