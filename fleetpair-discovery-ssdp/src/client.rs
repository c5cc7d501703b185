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

//! SSDP search client implementation

use crate::message;
use crate::multicast_addr;
use async_trait::async_trait;
use fleetpair_discovery::{Announcement, DiscoveryClient, DiscoveryError};
use futures::stream::BoxStream;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// SSDP-based implementation of DiscoveryClient
///
/// Sends one `M-SEARCH` for the requested service type and yields every
/// answering `200 OK` or `ssdp:alive` announcement on the response stream,
/// in arrival order.
pub struct SsdpClient {
    socket: Arc<UdpSocket>,
    target: SocketAddr,
    recv_task: Option<JoinHandle<()>>,
    responses: Mutex<Option<mpsc::UnboundedReceiver<Announcement>>>,
}

impl SsdpClient {
    /// Create a client searching the standard SSDP multicast group.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::SearchFailed` if no local socket can be
    /// bound.
    pub fn new() -> Result<Self, DiscoveryError> {
        Self::with_target(multicast_addr())
    }

    /// Create a client sending its search to an explicit unicast address.
    /// Intended for tests and single-host setups.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::SearchFailed` if no local socket can be
    /// bound.
    pub fn with_target(target: SocketAddr) -> Result<Self, DiscoveryError> {
        let socket = std::net::UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DiscoveryError::SearchFailed(format!("Failed to bind socket: {e}")))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| DiscoveryError::SearchFailed(format!("Failed to set nonblocking: {e}")))?;
        let socket = UdpSocket::from_std(socket)
            .map_err(|e| DiscoveryError::SearchFailed(format!("Failed to register socket: {e}")))?;

        Ok(Self {
            socket: Arc::new(socket),
            target,
            recv_task: None,
            responses: Mutex::new(None),
        })
    }
}

#[async_trait]
impl DiscoveryClient for SsdpClient {
    async fn search(&mut self, service_type: &str) -> Result<(), DiscoveryError> {
        self.socket
            .send_to(message::build_search(service_type).as_bytes(), self.target)
            .await
            .map_err(|e| DiscoveryError::SearchFailed(format!("Failed to send search: {e}")))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let socket = self.socket.clone();
        let service_type = service_type.to_string();

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

                let Some(parsed) = message::parse(&buf[..len]) else {
                    continue;
                };
                let Some(announcement) = parsed.into_announcement(&service_type) else {
                    continue;
                };

                log::debug!(
                    "SSDP: announcement from {peer}: {}/{}",
                    announcement.location,
                    announcement.device_id
                );
                if tx.send(announcement).is_err() {
                    // Stream consumer is gone.
                    break;
                }
            }
        });

        if let Some(previous) = self.recv_task.replace(task) {
            previous.abort();
        }
        *self.responses.lock().unwrap_or_else(|e| e.into_inner()) = Some(rx);
        Ok(())
    }

    fn responses(&self) -> BoxStream<'_, Announcement> {
        let receiver = self.responses.lock().unwrap_or_else(|e| e.into_inner()).take();
        Box::pin(async_stream::stream! {
            let Some(mut receiver) = receiver else { return };
            while let Some(announcement) = receiver.recv().await {
                yield announcement;
            }
        })
    }

    async fn stop(&mut self) -> Result<(), DiscoveryError> {
        if let Some(task) = self.recv_task.take() {
            task.abort();
        }
        Ok(())
    }
}

impl Drop for SsdpClient {
    fn drop(&mut self) {
        if let Some(task) = self.recv_task.take() {
            task.abort();
        }
    }
}
