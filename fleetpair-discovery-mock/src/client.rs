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

//! Mock discovery client implementation

use crate::backend::{BackendEvent, MockBackend};
use async_trait::async_trait;
use fleetpair_discovery::{Announcement, DiscoveryClient, DiscoveryError};
use futures::stream::BoxStream;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock implementation of DiscoveryClient
///
/// Reads announcements from an in-memory backend shared with
/// `MockResponder` instances: first a snapshot of everything already
/// advertised, then live events.
pub struct MockClient {
    backend: MockBackend,
    searched: Arc<RwLock<Option<String>>>,
}

impl MockClient {
    /// Create a new mock client
    pub fn new(backend: MockBackend) -> Self {
        Self {
            backend,
            searched: Arc::new(RwLock::new(None)),
        }
    }
}

#[async_trait]
impl DiscoveryClient for MockClient {
    async fn search(&mut self, service_type: &str) -> Result<(), DiscoveryError> {
        self.backend.record_search();
        *self.searched.write().await = Some(service_type.to_string());
        Ok(())
    }

    fn responses(&self) -> BoxStream<'_, Announcement> {
        let backend = self.backend.clone();
        let searched = self.searched.clone();
        let mut receiver = self.backend.subscribe();

        Box::pin(async_stream::stream! {
            let Some(service_type) = searched.read().await.clone() else {
                // No search sent; nothing will ever arrive.
                return;
            };

            // What has already been yielded, by device id. An event
            // that raced between subscribing and taking the snapshot
            // would otherwise be delivered twice.
            let mut yielded: HashMap<String, String> = HashMap::new();

            // Announcements already live when the search went out,
            // in advertisement order.
            for announcement in backend.announcements().await {
                if announcement.service_type.eq_ignore_ascii_case(&service_type) {
                    yielded.insert(announcement.device_id.clone(), announcement.location.clone());
                    yield announcement;
                }
            }

            loop {
                match receiver.recv().await {
                    Ok(BackendEvent::Advertised(announcement)) => {
                        if !announcement.service_type.eq_ignore_ascii_case(&service_type) {
                            continue;
                        }
                        if yielded.get(&announcement.device_id) == Some(&announcement.location) {
                            continue;
                        }
                        yielded.insert(announcement.device_id.clone(), announcement.location.clone());
                        yield announcement;
                    }
                    Ok(BackendEvent::Withdrawn(device_id)) => {
                        // A withdrawn endpoint may come back later and
                        // should be announced again when it does.
                        yielded.remove(&device_id);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {
                        // Some events were missed, continue with the next one
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    async fn stop(&mut self) -> Result<(), DiscoveryError> {
        *self.searched.write().await = None;
        Ok(())
    }
}
