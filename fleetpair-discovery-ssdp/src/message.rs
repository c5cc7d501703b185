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

//! SSDP wire format
//!
//! Three datagram kinds are exchanged: `M-SEARCH` requests, `200 OK`
//! search responses, and `NOTIFY` alive announcements. Header names are
//! matched case-insensitively; anything unparseable is ignored by callers.

use fleetpair_discovery::{Advertisement, Announcement};
use std::collections::HashMap;

const CRLF: &str = "\r\n";

/// A parsed SSDP datagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SsdpMessage {
    /// `M-SEARCH * HTTP/1.1`
    Search {
        /// Searched service type (`ST` header)
        service_type: String,
    },

    /// `HTTP/1.1 200 OK` answer to a search
    Response {
        /// Answered service type (`ST` header)
        service_type: String,
        /// Device id decoded from the `USN` header
        device_id: String,
        /// `LOCATION` header
        location: String,
        /// `max-age` from `CACHE-CONTROL`, when present
        max_age: Option<u32>,
    },

    /// `NOTIFY * HTTP/1.1` with `NTS: ssdp:alive`
    Alive {
        /// Announced service type (`NT` header)
        service_type: String,
        /// Device id decoded from the `USN` header
        device_id: String,
        /// `LOCATION` header
        location: String,
    },
}

impl SsdpMessage {
    /// Convert a response or alive announcement for `service_type` into an
    /// `Announcement`. Searches and announcements for other service types
    /// yield `None`.
    pub fn into_announcement(self, service_type: &str) -> Option<Announcement> {
        match self {
            SsdpMessage::Response {
                service_type: st,
                device_id,
                location,
                ..
            }
            | SsdpMessage::Alive {
                service_type: st,
                device_id,
                location,
            } if st.eq_ignore_ascii_case(service_type) => Some(Announcement {
                location,
                device_id,
                service_type: st,
            }),
            _ => None,
        }
    }
}

/// Encode a device id into the composite `USN` form `uuid:<id>::<st>`
pub fn encode_usn(device_id: &str, service_type: &str) -> String {
    format!("uuid:{device_id}::{service_type}")
}

/// Decode a device id from a `USN` header
///
/// Accepts the composite `uuid:<id>::<st>` form as well as a bare value.
pub fn decode_usn(usn: &str) -> String {
    let rest = usn.strip_prefix("uuid:").unwrap_or(usn);
    match rest.find("::") {
        Some(idx) => rest[..idx].to_string(),
        None => rest.to_string(),
    }
}

/// Build an `M-SEARCH` datagram for the given service type
pub fn build_search(service_type: &str) -> String {
    format!(
        "M-SEARCH * HTTP/1.1{CRLF}\
         HOST: 239.255.255.250:1900{CRLF}\
         MAN: \"ssdp:discover\"{CRLF}\
         MX: 2{CRLF}\
         ST: {service_type}{CRLF}{CRLF}"
    )
}

/// Build a `200 OK` search response carrying the advertisement
pub fn build_response(ad: &Advertisement) -> String {
    format!(
        "HTTP/1.1 200 OK{CRLF}\
         CACHE-CONTROL: max-age={}{CRLF}\
         ST: {}{CRLF}\
         USN: {}{CRLF}\
         LOCATION: {}{CRLF}\
         SERVER: fleetpair/0.1 UPnP/1.1{CRLF}\
         EXT:{CRLF}{CRLF}",
        ad.max_age,
        ad.service_type,
        encode_usn(&ad.device_id, &ad.service_type),
        ad.location,
    )
}

/// Build a `NOTIFY ssdp:alive` announcement carrying the advertisement
pub fn build_alive(ad: &Advertisement) -> String {
    format!(
        "NOTIFY * HTTP/1.1{CRLF}\
         HOST: 239.255.255.250:1900{CRLF}\
         CACHE-CONTROL: max-age={}{CRLF}\
         NT: {}{CRLF}\
         NTS: ssdp:alive{CRLF}\
         USN: {}{CRLF}\
         LOCATION: {}{CRLF}{CRLF}",
        ad.max_age,
        ad.service_type,
        encode_usn(&ad.device_id, &ad.service_type),
        ad.location,
    )
}

/// Parse an SSDP datagram
///
/// Returns `None` for datagrams that are not valid UTF-8, carry an unknown
/// start line, or miss a required header.
pub fn parse(datagram: &[u8]) -> Option<SsdpMessage> {
    let text = std::str::from_utf8(datagram).ok()?;
    let mut lines = text.lines();
    let start = lines.next()?.trim();

    let mut headers: HashMap<String, String> = HashMap::new();
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    if start.starts_with("M-SEARCH") {
        Some(SsdpMessage::Search {
            service_type: headers.remove("st")?,
        })
    } else if start.starts_with("HTTP/1.1 200") || start.starts_with("HTTP/1.0 200") {
        Some(SsdpMessage::Response {
            service_type: headers.remove("st")?,
            device_id: decode_usn(&headers.remove("usn")?),
            location: headers.remove("location")?,
            max_age: headers
                .get("cache-control")
                .and_then(|v| parse_max_age(v)),
        })
    } else if start.starts_with("NOTIFY") {
        // Only alive announcements carry an endpoint worth reporting.
        if headers.get("nts").map(String::as_str) != Some("ssdp:alive") {
            return None;
        }
        Some(SsdpMessage::Alive {
            service_type: headers.remove("nt")?,
            device_id: decode_usn(&headers.remove("usn")?),
            location: headers.remove("location")?,
        })
    } else {
        None
    }
}

fn parse_max_age(cache_control: &str) -> Option<u32> {
    let (_, value) = cache_control.split_once("max-age=")?;
    value
        .split(|c: char| !c.is_ascii_digit())
        .next()?
        .parse()
        .ok()
}
