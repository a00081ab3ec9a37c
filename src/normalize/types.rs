//! Normalized error types

use crate::transport::TransportError;
use crate::types::{Headers, JsonValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure class of an execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorType {
    /// The server answered with a non-2xx status
    #[serde(rename = "HTTP Response Error")]
    HttpResponse,
    /// The request left the client but nothing came back
    #[serde(rename = "Network Error")]
    Network,
    /// The request was never dispatched
    #[serde(rename = "Request Setup Error")]
    RequestSetup,
}

impl ErrorType {
    /// Classify a transport failure
    pub fn of(error: &TransportError) -> Self {
        match error {
            TransportError::Response { .. } => ErrorType::HttpResponse,
            TransportError::Network { .. } => ErrorType::Network,
            TransportError::Setup { .. } => ErrorType::RequestSetup,
        }
    }

    /// Display name
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorType::HttpResponse => "HTTP Response Error",
            ErrorType::Network => "Network Error",
            ErrorType::RequestSetup => "Request Setup Error",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything known about a failure, for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedErrorDetails {
    pub error_type: ErrorType,
    pub message: String,
    /// RFC 3339 timestamp of normalization
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Request timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<Headers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Headers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<JsonValue>,
}
