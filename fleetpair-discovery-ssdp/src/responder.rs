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

//! SSDP responder implementation

use crate::message::{self, SsdpMessage};
use crate::{multicast_addr, SSDP_GROUP, SSDP_PORT};
use async_trait::async_trait;
use fleetpair_discovery::{Advertisement, DiscoveryError, DiscoveryResponder};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// SSDP-based implementation of DiscoveryResponder
///
/// Binds the SSDP port, joins the multicast group, and once advertising
/// answers every `M-SEARCH` for the advertised service type with a unicast
/// `200 OK`. A single `NOTIFY ssdp:alive` is multicast when advertising
/// starts.
pub struct SsdpResponder {
    socket: Arc<UdpSocket>,
    answer_task: Option<JoinHandle<()>>,
}

impl SsdpResponder {
    /// Create a responder on the standard SSDP group and port.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ResponderFailed` if the SSDP port cannot be
    /// bound or the multicast group cannot be joined.
    pub fn new() -> Result<Self, DiscoveryError> {
        let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, SSDP_PORT));
        Self::bind_inner(addr, true)
    }

    /// Create a responder bound to an explicit address, without joining the
    /// multicast group. Searches reach it by unicast only; intended for
    /// tests and single-host setups.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ResponderFailed` if the address cannot be
    /// bound.
    pub fn bind(addr: SocketAddr) -> Result<Self, DiscoveryError> {
        Self::bind_inner(addr, false)
    }

    fn bind_inner(addr: SocketAddr, join_group: bool) -> Result<Self, DiscoveryError> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(|e| DiscoveryError::ResponderFailed(format!("Failed to open socket: {e}")))?;
        // Other SSDP-speaking processes may share the port.
        socket
            .set_reuse_address(true)
            .map_err(|e| DiscoveryError::ResponderFailed(format!("Failed to set reuseaddr: {e}")))?;
        socket
            .bind(&addr.into())
            .map_err(|e| DiscoveryError::ResponderFailed(format!("Failed to bind {addr}: {e}")))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| DiscoveryError::ResponderFailed(format!("Failed to set nonblocking: {e}")))?;

        let std_socket: std::net::UdpSocket = socket.into();
        if join_group {
            std_socket
                .join_multicast_v4(&SSDP_GROUP, &Ipv4Addr::UNSPECIFIED)
                .map_err(|e| {
                    DiscoveryError::ResponderFailed(format!("Failed to join {SSDP_GROUP}: {e}"))
                })?;
        }

        let socket = UdpSocket::from_std(std_socket).map_err(|e| {
            DiscoveryError::ResponderFailed(format!("Failed to register socket: {e}"))
        })?;

        Ok(Self {
            socket: Arc::new(socket),
            answer_task: None,
        })
    }

    /// Address the responder is bound to
    ///
    /// # Errors
    ///
    /// Returns an error if the local address cannot be read.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

#[async_trait]
impl DiscoveryResponder for SsdpResponder {
    async fn advertise(&mut self, ad: Advertisement) -> Result<(), DiscoveryError> {
        // Best-effort alive announcement; search answers are the real path.
        if let Err(e) = self
            .socket
            .send_to(message::build_alive(&ad).as_bytes(), multicast_addr())
            .await
        {
            log::debug!("SSDP: alive announcement not sent: {e}");
        }

        let socket = self.socket.clone();
        let task = tokio::spawn(async move {
            let mut buf = [0u8; 2048];
            loop {
                let (len, peer) = match socket.recv_from(&mut buf).await {
                    Ok(received) => received,
                    Err(e) => {
                        log::debug!("SSDP: recv failed: {e}");
                        continue;
                    }
                };

                let Some(SsdpMessage::Search { service_type }) = message::parse(&buf[..len])
                else {
                    continue;
                };
                if !service_type.eq_ignore_ascii_case(&ad.service_type) {
                    continue;
                }

                log::debug!("SSDP: answering search from {peer}");
                if let Err(e) = socket
                    .send_to(message::build_response(&ad).as_bytes(), peer)
                    .await
                {
                    log::debug!("SSDP: answer to {peer} not sent: {e}");
                }
            }
        });

        if let Some(previous) = self.answer_task.replace(task) {
            previous.abort();
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), DiscoveryError> {
        if let Some(task) = self.answer_task.take() {
            task.abort();
        }
        Ok(())
    }
}

impl Drop for SsdpResponder {
    fn drop(&mut self) {
        if let Some(task) = self.answer_task.take() {
            task.abort();
        }
    }
}
