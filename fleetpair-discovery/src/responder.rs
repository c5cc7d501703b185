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

//! Discovery responder trait

use crate::{Advertisement, DiscoveryError};
use async_trait::async_trait;

/// Advertises this node as the fleet's management endpoint
///
/// Implementations answer searches for the management service type with the
/// advertised device id and location, until stopped.
#[async_trait]
pub trait DiscoveryResponder: Send + Sync {
    /// Start advertising
    ///
    /// Registers the advertisement and begins answering searches for its
    /// service type.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ResponderFailed` if advertising cannot be
    /// started.
    async fn advertise(&mut self, ad: Advertisement) -> Result<(), DiscoveryError>;

    /// Stop advertising
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::StopFailed` if the session cannot be torn
    /// down cleanly.
    async fn stop(&mut self) -> Result<(), DiscoveryError>;
}
