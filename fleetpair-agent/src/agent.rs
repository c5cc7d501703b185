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

//! Role monitor and discovery roles
//!
//! The monitor re-evaluates local workload state every cycle and launches
//! one role as a supervised background task: the advertiser when this node
//! hosts the management workload, the listener otherwise. Tasks are
//! fire-and-forget; a panic inside one is caught and logged, and nothing is
//! restarted until the next cycle launches a fresh task.

use crate::config::ConfigHandle;
use crate::keyring::Keyring;
use crate::pairing::{self, DependentClient};
use crate::runtime::WorkloadState;
use crate::store::EndpointStore;
use crate::{keys, net, probe};
use crate::{
    ADVERTISEMENT_MAX_AGE, HOST_PLACEHOLDER_LEN, LISTEN_WINDOW, MANAGEMENT_ADDR,
    MANAGEMENT_WORKLOAD, MONITOR_INTERVAL,
};
use fleetpair_discovery::{
    should_accept, Advertisement, Announcement, DiscoveryBackend, MANAGEMENT_SERVICE_TYPE,
};
use futures::{FutureExt, StreamExt};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// The discovery and pairing subsystem of one fleet node
///
/// Holds the live configuration handle and the node's collaborators; all
/// roles run against these shared handles.
pub struct Agent {
    config: ConfigHandle,
    discovery: Arc<dyn DiscoveryBackend>,
    store: Arc<dyn EndpointStore>,
    workload: Arc<dyn WorkloadState>,
    keyring: Arc<dyn Keyring>,
    dependents: Arc<dyn DependentClient>,
}

impl Agent {
    pub fn new(
        config: ConfigHandle,
        discovery: Arc<dyn DiscoveryBackend>,
        store: Arc<dyn EndpointStore>,
        workload: Arc<dyn WorkloadState>,
        keyring: Arc<dyn Keyring>,
        dependents: Arc<dyn DependentClient>,
    ) -> Self {
        Self {
            config,
            discovery,
            store,
            workload,
            keyring,
            dependents,
        }
    }

    /// Live configuration handle
    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Role monitor loop; runs forever.
    ///
    /// Each cycle launches exactly one role task. Overlapping tasks from
    /// earlier cycles are tolerated; each stops on its own exit condition.
    pub async fn run(self: Arc<Self>) {
        loop {
            if self.workload.is_running(MANAGEMENT_WORKLOAD).await {
                // Hosting the management role pairs a node with itself.
                self.pair(MANAGEMENT_ADDR).await;
                let agent = self.clone();
                spawn_supervised("advertiser", async move { agent.advertise().await });
            } else {
                let agent = self.clone();
                spawn_supervised("listener", async move { agent.listen().await });
            }
            tokio::time::sleep(MONITOR_INTERVAL).await;
        }
    }

    /// Advertiser role: announce this node as the management endpoint
    /// until the local identity probe reports no identity.
    pub async fn advertise(&self) {
        let mut responder = match self.discovery.responder() {
            Ok(responder) => responder,
            Err(e) => {
                warn!("Starting discovery responder: {e}");
                return;
            }
        };

        let location = match net::local_ip() {
            Some(ip) => ip.to_string(),
            None => {
                warn!("No local address to advertise");
                return;
            }
        };
        let device_id = probe::management_fingerprint(&self.config).await;

        debug!("Advertising management endpoint on {MANAGEMENT_SERVICE_TYPE}");
        let ad = Advertisement {
            service_type: MANAGEMENT_SERVICE_TYPE.to_string(),
            device_id,
            location,
            max_age: ADVERTISEMENT_MAX_AGE,
        };
        if let Err(e) = responder.advertise(ad).await {
            warn!("Starting discovery responder: {e}");
            return;
        }

        // Keep advertising only while the local management service still
        // reports an identity.
        while !probe::management_fingerprint(&self.config).await.is_empty() {
            tokio::time::sleep(MONITOR_INTERVAL).await;
        }

        if let Err(e) = responder.stop().await {
            debug!("Stopping discovery responder: {e}");
        }
    }

    /// Listener role: wait briefly for management announcements and route
    /// each one through the selection policy. A node that already paired
    /// does not keep listening.
    pub async fn listen(&self) {
        if self.config.host().await.len() > HOST_PLACEHOLDER_LEN {
            return;
        }

        let mut client = match self.discovery.client() {
            Ok(client) => client,
            Err(e) => {
                warn!("Starting discovery client: {e}");
                return;
            }
        };

        debug!("Searching for management endpoint on {MANAGEMENT_SERVICE_TYPE}");
        if let Err(e) = client.search(MANAGEMENT_SERVICE_TYPE).await {
            warn!("Searching for management endpoint: {e}");
            return;
        }

        {
            let mut responses = client.responses();
            let window = tokio::time::sleep(LISTEN_WINDOW);
            tokio::pin!(window);
            loop {
                tokio::select! {
                    () = &mut window => break,
                    maybe = responses.next() => match maybe {
                        Some(announcement) => self.handle_announcement(announcement).await,
                        None => break,
                    },
                }
            }
        }

        if let Err(e) = client.stop().await {
            debug!("Stopping discovery client: {e}");
        }
    }

    /// Pair with the given endpoint address
    pub async fn pair(&self, address: &str) -> bool {
        pairing::persist_endpoint(
            self.store.as_ref(),
            &self.config,
            self.dependents.as_ref(),
            address,
        )
        .await
    }

    /// Fetch and import the paired endpoint's public key
    pub async fn import_management_key(&self) {
        keys::import_management_key(&self.config, self.keyring.as_ref()).await;
    }

    async fn handle_announcement(&self, announcement: Announcement) {
        debug!(
            "Found server {}/{}/{}",
            announcement.location, announcement.device_id, announcement.service_type
        );

        let snapshot = self.config.snapshot().await;
        if !should_accept(&announcement, &snapshot.fingerprint, &snapshot.host) {
            trace!("Announcement from {} rejected by policy", announcement.location);
            return;
        }

        if self.pair(&announcement.location).await {
            self.import_management_key().await;
        }
    }
}

/// Launch a fire-and-forget task behind a recovery boundary.
///
/// A panic inside the task becomes a logged event and ordinary task
/// completion; it never reaches the monitor or other tasks.
pub fn spawn_supervised(name: &'static str, task: impl Future<Output = ()> + Send + 'static) {
    tokio::spawn(async move {
        if AssertUnwindSafe(task).catch_unwind().await.is_err() {
            warn!("{name} task panicked");
        }
    });
}
