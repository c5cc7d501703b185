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

//! Best-effort fetch behavior of the identity probe and key exchange
//!
//! Both fetches must yield absence (empty string / no key) on non-200
//! responses and transport errors, never a fault. The inner fetch
//! functions are URL-agnostic, so a plain-HTTP one-shot server on
//! loopback exercises them.

use fleetpair_agent::{http, keys, probe};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one HTTP response on loopback, then close
async fn serve_once(status_line: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    addr
}

/// An address nothing listens on
async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[tokio::test]
async fn identity_ok_returns_body() {
    let addr = serve_once("200 OK", "fp-local-management").await;
    let client = http::client(false).unwrap();

    let identity = probe::fetch_identity(&client, &format!("http://{addr}/")).await;
    assert_eq!(identity, "fp-local-management");
}

#[tokio::test]
async fn identity_non_200_is_empty() {
    let addr = serve_once("404 Not Found", "missing").await;
    let client = http::client(false).unwrap();

    let identity = probe::fetch_identity(&client, &format!("http://{addr}/")).await;
    assert_eq!(identity, "");
}

#[tokio::test]
async fn identity_transport_error_is_empty() {
    let addr = closed_port().await;
    let client = http::client(false).unwrap();

    let identity = probe::fetch_identity(&client, &format!("http://{addr}/")).await;
    assert_eq!(identity, "");
}

#[tokio::test]
async fn key_ok_returns_bytes() {
    let addr = serve_once("200 OK", "PUBLIC KEY MATERIAL").await;
    let client = http::client(false).unwrap();

    let key = keys::fetch_key(&client, &format!("http://{addr}/")).await;
    assert_eq!(key.as_deref(), Some(b"PUBLIC KEY MATERIAL".as_slice()));
}

#[tokio::test]
async fn key_non_200_is_absent() {
    let addr = serve_once("500 Internal Server Error", "").await;
    let client = http::client(false).unwrap();

    let key = keys::fetch_key(&client, &format!("http://{addr}/")).await;
    assert_eq!(key, None);
}

#[tokio::test]
async fn key_transport_error_is_absent() {
    let addr = closed_port().await;
    let client = http::client(false).unwrap();

    let key = keys::fetch_key(&client, &format!("http://{addr}/")).await;
    assert_eq!(key, None);
}

#[test]
fn probe_url_is_the_local_management_address() {
    assert_eq!(
        probe::identity_url(),
        "https://10.10.10.1:8443/rest/v1/security/keyman/getpublickeyfingerprint"
    );
}
