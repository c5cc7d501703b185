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

//! Discovery announcement types

/// Service type identifying the management-endpoint discovery channel.
///
/// Fixed for the whole fleet; a node only answers or reacts to searches
/// carrying this exact string.
pub const MANAGEMENT_SERVICE_TYPE: &str = "urn:fleetpair:management:node:1";

/// A discovery response describing one candidate management endpoint.
///
/// IMPORTANT: Two announcements are considered equal if they have the same
/// `device_id`, regardless of location. The network address of an endpoint
/// can change between announcements, but the device id is its stable,
/// cryptographic identity.
#[derive(Debug, Clone)]
pub struct Announcement {
    /// Network address of the candidate endpoint
    pub location: String,

    /// Candidate's cryptographic fingerprint
    /// This is the STABLE identifier for the endpoint
    pub device_id: String,

    /// Discovery service type the announcement was made under
    pub service_type: String,
}

impl PartialEq for Announcement {
    fn eq(&self, other: &Self) -> bool {
        // Equality based ONLY on device id (stable cryptographic identity)
        self.device_id == other.device_id
    }
}

impl Eq for Announcement {}

/// Information needed to advertise this node as the management endpoint
#[derive(Debug, Clone)]
pub struct Advertisement {
    /// Discovery service type to advertise under
    pub service_type: String,

    /// Local cryptographic fingerprint (becomes the announced device id)
    pub device_id: String,

    /// Local network address (becomes the announced location)
    pub location: String,

    /// Advertisement TTL in seconds
    pub max_age: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announcement_equality_ignores_location() {
        let a = Announcement {
            location: "10.0.0.1".to_string(),
            device_id: "fp-1".to_string(),
            service_type: MANAGEMENT_SERVICE_TYPE.to_string(),
        };
        let b = Announcement {
            location: "10.0.0.2".to_string(),
            device_id: "fp-1".to_string(),
            service_type: MANAGEMENT_SERVICE_TYPE.to_string(),
        };
        assert_eq!(a, b);
    }

    #[test]
    fn announcement_inequality_on_device_id() {
        let a = Announcement {
            location: "10.0.0.1".to_string(),
            device_id: "fp-1".to_string(),
            service_type: MANAGEMENT_SERVICE_TYPE.to_string(),
        };
        let b = Announcement {
            location: "10.0.0.1".to_string(),
            device_id: "fp-2".to_string(),
            service_type: MANAGEMENT_SERVICE_TYPE.to_string(),
        };
        assert_ne!(a, b);
    }
}
