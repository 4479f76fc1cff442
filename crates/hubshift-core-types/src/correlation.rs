//! Correlation types for request tracking
//!
//! Every HTTP request gets a `RequestId`, either taken from the incoming
//! `x-request-id` header or freshly generated, and echoed back on the response.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Header used to carry the request id in and out of the server
pub const HEADER_REQUEST_ID: &str = "x-request-id";

const MAX_INBOUND_ID_LEN: usize = 128;

/// Unique identifier for a single request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Accept a caller-supplied id from a header value.
    ///
    /// Returns `None` for blank, oversized or non-printable values so that a
    /// client cannot inject arbitrary text into the logs.
    pub fn from_header_value(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || trimmed.len() > MAX_INBOUND_ID_LEN
            || !trimmed.chars().all(|c| c.is_ascii_graphic())
        {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
