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

//! Integration tests for the mock discovery backend

use fleetpair_discovery::{
    Advertisement, DiscoveryBackend, DiscoveryClient, DiscoveryResponder, MANAGEMENT_SERVICE_TYPE,
};
use fleetpair_discovery_mock::{MockBackend, MockClient, MockDiscovery, MockResponder};
use futures::StreamExt;
use std::time::Duration;

fn advertisement(device_id: &str, location: &str) -> Advertisement {
    Advertisement {
        service_type: MANAGEMENT_SERVICE_TYPE.to_string(),
        device_id: device_id.to_string(),
        location: location.to_string(),
        max_age: 3600,
    }
}

#[tokio::test]
async fn advertise_and_search() {
    let backend = MockBackend::new();
    let mut responder = MockResponder::new(backend.clone());
    let mut client = MockClient::new(backend.clone());

    responder
        .advertise(advertisement("fp-A", "10.10.10.1"))
        .await
        .unwrap();

    client.search(MANAGEMENT_SERVICE_TYPE).await.unwrap();
    let announcement = client.responses().next().await.unwrap();

    assert_eq!(announcement.device_id, "fp-A");
    assert_eq!(announcement.location, "10.10.10.1");
}

#[tokio::test]
async fn late_advertisement_reaches_searching_client() {
    let backend = MockBackend::new();
    let mut responder = MockResponder::new(backend.clone());
    let mut client = MockClient::new(backend.clone());

    client.search(MANAGEMENT_SERVICE_TYPE).await.unwrap();

    let mut responses = client.responses();
    let receive = tokio::time::timeout(Duration::from_secs(1), responses.next());

    responder
        .advertise(advertisement("fp-late", "10.10.10.2"))
        .await
        .unwrap();

    let announcement = receive.await.expect("timed out").unwrap();
    assert_eq!(announcement.device_id, "fp-late");
}

#[tokio::test]
async fn announcements_arrive_in_order() {
    let backend = MockBackend::new();
    let mut first = MockResponder::new(backend.clone());
    let mut second = MockResponder::new(backend.clone());
    let mut client = MockClient::new(backend.clone());

    client.search(MANAGEMENT_SERVICE_TYPE).await.unwrap();
    let mut responses = client.responses();

    first
        .advertise(advertisement("fp-1", "10.0.0.1"))
        .await
        .unwrap();
    second
        .advertise(advertisement("fp-2", "10.0.0.2"))
        .await
        .unwrap();

    assert_eq!(responses.next().await.unwrap().device_id, "fp-1");
    assert_eq!(responses.next().await.unwrap().device_id, "fp-2");
}

#[tokio::test]
async fn earlier_announcements_replay_in_advertisement_order() {
    let backend = MockBackend::new();
    let mut responder = MockResponder::new(backend.clone());
    let mut client = MockClient::new(backend.clone());

    for (device_id, location) in [
        ("fp-1", "10.0.0.1"),
        ("fp-2", "10.0.0.2"),
        ("fp-3", "10.0.0.3"),
    ] {
        responder
            .advertise(advertisement(device_id, location))
            .await
            .unwrap();
    }

    client.search(MANAGEMENT_SERVICE_TYPE).await.unwrap();
    let mut responses = client.responses();

    assert_eq!(responses.next().await.unwrap().device_id, "fp-1");
    assert_eq!(responses.next().await.unwrap().device_id, "fp-2");
    assert_eq!(responses.next().await.unwrap().device_id, "fp-3");
}

#[tokio::test]
async fn repeated_advertisement_is_announced_once() {
    let backend = MockBackend::new();
    let mut responder = MockResponder::new(backend.clone());
    let mut client = MockClient::new(backend.clone());

    responder
        .advertise(advertisement("fp-A", "10.0.0.1"))
        .await
        .unwrap();

    client.search(MANAGEMENT_SERVICE_TYPE).await.unwrap();
    let mut responses = client.responses();

    // A refresh lands in the event channel before the stream is first
    // polled; it must not be announced on top of the replay.
    responder
        .advertise(advertisement("fp-A", "10.0.0.1"))
        .await
        .unwrap();
    responder
        .advertise(advertisement("fp-B", "10.0.0.2"))
        .await
        .unwrap();

    assert_eq!(responses.next().await.unwrap().device_id, "fp-A");
    assert_eq!(responses.next().await.unwrap().device_id, "fp-B");
}

#[tokio::test]
async fn withdrawn_endpoint_is_announced_again_on_return() {
    let backend = MockBackend::new();
    let mut responder = MockResponder::new(backend.clone());
    let mut client = MockClient::new(backend.clone());

    responder
        .advertise(advertisement("fp-A", "10.0.0.1"))
        .await
        .unwrap();

    client.search(MANAGEMENT_SERVICE_TYPE).await.unwrap();
    let mut responses = client.responses();
    assert_eq!(responses.next().await.unwrap().device_id, "fp-A");

    responder.stop().await.unwrap();
    responder
        .advertise(advertisement("fp-A", "10.0.0.1"))
        .await
        .unwrap();

    let returned = tokio::time::timeout(Duration::from_secs(1), responses.next())
        .await
        .expect("timed out")
        .unwrap();
    assert_eq!(returned.device_id, "fp-A");
}

#[tokio::test]
async fn factory_produces_working_sessions() {
    let discovery = MockDiscovery::new(MockBackend::new());

    let mut responder = discovery.responder().unwrap();
    responder
        .advertise(advertisement("fp-A", "10.10.10.1"))
        .await
        .unwrap();

    let mut client = discovery.client().unwrap();
    client.search(MANAGEMENT_SERVICE_TYPE).await.unwrap();
    assert_eq!(discovery.backend().search_count(), 1);

    let announcement = client.responses().next().await.unwrap();
    assert_eq!(announcement.location, "10.10.10.1");
}

#[tokio::test]
async fn factory_failure_injection() {
    let discovery = MockDiscovery::new(MockBackend::new());
    discovery.set_fail_init(true);

    assert!(discovery.responder().is_err());
    assert!(discovery.client().is_err());

    discovery.set_fail_init(false);
    assert!(discovery.responder().is_ok());
}
