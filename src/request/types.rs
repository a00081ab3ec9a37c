//! Request and response descriptors
//!
//! These are the diagnostics attached to every [`QueryResult`](crate::engine::QueryResult):
//! what was sent and what came back.

use crate::types::{Headers, JsonValue};
use serde::{Deserialize, Serialize};

/// Content type for single JSON documents
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type for newline-delimited JSON
pub const CONTENT_TYPE_NDJSON: &str = "application/x-ndjson";

/// Outbound request body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// A parsed JSON document, serialized by the transport
    Json(JsonValue),
    /// Pre-serialized JSON text, sent as-is
    Text(String),
    /// Pre-framed NDJSON, sent as-is and never re-serialized
    Ndjson(String),
}

impl RequestBody {
    /// True when there is no body
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }

    /// True for bodies the transport must send byte for byte
    pub fn is_preformatted(&self) -> bool {
        matches!(self, RequestBody::Ndjson(_))
    }

    /// Serialize to the bytes sent on the wire
    pub fn to_wire(&self) -> Option<String> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(value) => Some(value.to_string()),
            RequestBody::Text(text) | RequestBody::Ndjson(text) => Some(text.clone()),
        }
    }

    /// The body as a JSON value, for diagnostics
    pub fn to_json(&self) -> JsonValue {
        match self {
            RequestBody::Empty => JsonValue::Null,
            RequestBody::Json(value) => value.clone(),
            RequestBody::Text(text) | RequestBody::Ndjson(text) => JsonValue::String(text.clone()),
        }
    }
}

/// What was sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub method: String,
    /// Path relative to the cluster endpoint
    pub endpoint: String,
    pub headers: Headers,
    #[serde(default, skip_serializing_if = "RequestBody::is_empty")]
    pub body: RequestBody,
}

impl RequestInfo {
    /// Value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The `Content-Type` header
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }
}

/// What came back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseInfo {
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
}
