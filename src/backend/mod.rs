//! REST backend access
//!
//! Everything here goes through [`BackendClient::fetch_with_auth`], so any
//! call may refresh (or clear) the session it was given.

pub mod client;
pub mod organisations;
pub mod permissions;
pub mod procedures;
pub mod response;
pub mod roles;
pub mod salons;
pub mod staff;
pub mod users;

pub use client::{BackendClient, RequestOptions, REFRESH_PATH};
pub use response::{parse_json_safe, ApiError};

use url::form_urlencoded;

/// Percent-encode a single path segment
pub fn encode_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Append a query string built from the pairs that are present
pub fn with_query(path: &str, pairs: &[(&str, Option<&str>)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        if let Some(value) = value {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{}?{}", path, serializer.finish())
    } else {
        path.to_string()
    }
}
