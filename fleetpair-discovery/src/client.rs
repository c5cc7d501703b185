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

//! Discovery client trait

use crate::{Announcement, DiscoveryError};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Searches for the fleet's management endpoint
///
/// Implementations send a search for the given service type and deliver
/// every answering announcement, in arrival order, on the response stream.
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Send a search for the given service type
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::SearchFailed` if the search cannot be sent.
    async fn search(&mut self, service_type: &str) -> Result<(), DiscoveryError>;

    /// Stream of announcements answering the search
    ///
    /// Announcements are yielded in the order they arrive. The stream ends
    /// when the session is stopped; callers bound the wait themselves.
    fn responses(&self) -> BoxStream<'_, Announcement>;

    /// Stop the session
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::StopFailed` if the session cannot be torn
    /// down cleanly.
    async fn stop(&mut self) -> Result<(), DiscoveryError>;
}
