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

//! Shared mock backend for in-memory announcements

use fleetpair_discovery::Announcement;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Event types for the mock backend
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// An endpoint started advertising
    Advertised(Announcement),
    /// An endpoint withdrew its advertisement
    Withdrawn(String), // device_id
}

/// Shared in-memory announcement registry
///
/// This backend is shared between `MockResponder` and `MockClient`
/// instances to simulate the multicast exchange in memory.
#[derive(Clone)]
pub struct MockBackend {
    inner: Arc<MockBackendInner>,
}

struct MockBackendInner {
    /// Currently advertised announcements in advertisement order,
    /// one entry per device id
    announcements: RwLock<Vec<Announcement>>,
    /// Event broadcast channel
    event_tx: broadcast::Sender<BackendEvent>,
    /// Number of searches sent through this backend
    searches: AtomicUsize,
}

impl MockBackend {
    /// Create a new mock backend
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            inner: Arc::new(MockBackendInner {
                announcements: RwLock::new(Vec::new()),
                event_tx,
                searches: AtomicUsize::new(0),
            }),
        }
    }

    /// Register an announcement (called by MockResponder)
    pub(crate) async fn advertise(&self, announcement: Announcement) {
        let mut announcements = self.inner.announcements.write().await;
        match announcements
            .iter_mut()
            .find(|a| a.device_id == announcement.device_id)
        {
            Some(existing) => *existing = announcement.clone(),
            None => announcements.push(announcement.clone()),
        }
        drop(announcements);

        // Notify searching clients
        let _ = self.inner.event_tx.send(BackendEvent::Advertised(announcement));
    }

    /// Withdraw an announcement (called by MockResponder)
    pub(crate) async fn withdraw(&self, device_id: &str) {
        self.inner
            .announcements
            .write()
            .await
            .retain(|a| a.device_id != device_id);

        let _ = self
            .inner
            .event_tx
            .send(BackendEvent::Withdrawn(device_id.to_string()));
    }

    /// Snapshot of current announcements in advertisement order
    /// (called by MockClient)
    pub(crate) async fn announcements(&self) -> Vec<Announcement> {
        self.inner.announcements.read().await.clone()
    }

    /// Subscribe to backend events (called by MockClient)
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Count a search (called by MockClient)
    pub(crate) fn record_search(&self) {
        self.inner.searches.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of searches sent so far (for testing)
    pub fn search_count(&self) -> usize {
        self.inner.searches.load(Ordering::SeqCst)
    }

    /// Number of live advertisements (for testing)
    pub async fn advertised_count(&self) -> usize {
        self.inner.announcements.read().await.len()
    }

    /// Remove all announcements (for testing)
    pub async fn clear(&self) {
        self.inner.announcements.write().await.clear();
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}
