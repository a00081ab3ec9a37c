//! Transport request/response/error types

use crate::request::RequestInfo;
use crate::types::{Headers, JsonValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A fully resolved request, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// Absolute URL (endpoint + path)
    pub url: String,
    /// Per-request timeout; zero disables it
    pub timeout: Duration,
    /// Method, path, headers and body
    pub info: RequestInfo,
}

impl TransportRequest {
    /// Resolve a request against a base endpoint
    pub fn new(base_url: &str, info: RequestInfo, timeout: Duration) -> Self {
        Self {
            url: build_url(base_url, &info.endpoint),
            timeout,
            info,
        }
    }

    /// HTTP method
    pub fn method(&self) -> &str {
        &self.info.method
    }

    /// True when the body must be sent without re-serialization
    pub fn is_preformatted(&self) -> bool {
        self.info.body.is_preformatted()
    }

    /// Timeout in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Join a base URL and a path with exactly one slash
pub fn build_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// A response that arrived, whatever its status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    /// Parsed JSON body, the raw text as a JSON string, or null when empty
    pub data: JsonValue,
}

impl TransportResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Parse a response body into a JSON value, keeping non-JSON text as a string
pub fn parse_response_data(text: &str) -> JsonValue {
    if text.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| JsonValue::String(text.to_string()))
}

// ============================================================================
// Errors
// ============================================================================

/// Why a request produced no response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkErrorKind {
    ConnectionRefused,
    DnsFailure,
    Timeout,
    ConnectionReset,
    CertificateExpired,
    CertificateInvalid,
    Other,
}

impl NetworkErrorKind {
    /// Conventional error code
    pub fn code(self) -> &'static str {
        match self {
            NetworkErrorKind::ConnectionRefused => "ECONNREFUSED",
            NetworkErrorKind::DnsFailure => "ENOTFOUND",
            NetworkErrorKind::Timeout => "ETIMEDOUT",
            NetworkErrorKind::ConnectionReset => "ECONNRESET",
            NetworkErrorKind::CertificateExpired => "CERT_HAS_EXPIRED",
            NetworkErrorKind::CertificateInvalid => "UNABLE_TO_VERIFY_LEAF_SIGNATURE",
            NetworkErrorKind::Other => "NETWORK_ERROR",
        }
    }

    /// Human-readable explanation
    pub fn description(self) -> &'static str {
        match self {
            NetworkErrorKind::ConnectionRefused => {
                "Connection refused - the server may not be running or is not reachable"
            }
            NetworkErrorKind::DnsFailure => "Host not found - check the endpoint URL",
            NetworkErrorKind::Timeout => "Request timed out - the server took too long to respond",
            NetworkErrorKind::ConnectionReset => "Connection reset by the server",
            NetworkErrorKind::CertificateExpired => "SSL certificate has expired",
            NetworkErrorKind::CertificateInvalid => "SSL certificate verification failed",
            NetworkErrorKind::Other => "No response received from the server",
        }
    }

    /// Map a conventional error code
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "ECONNREFUSED" => NetworkErrorKind::ConnectionRefused,
            "ENOTFOUND" | "EAI_AGAIN" => NetworkErrorKind::DnsFailure,
            "ETIMEDOUT" | "ECONNABORTED" | "ESOCKETTIMEDOUT" => NetworkErrorKind::Timeout,
            "ECONNRESET" | "EPIPE" => NetworkErrorKind::ConnectionReset,
            "CERT_HAS_EXPIRED" => NetworkErrorKind::CertificateExpired,
            "UNABLE_TO_VERIFY_LEAF_SIGNATURE"
            | "SELF_SIGNED_CERT_IN_CHAIN"
            | "DEPTH_ZERO_SELF_SIGNED_CERT" => NetworkErrorKind::CertificateInvalid,
            _ => NetworkErrorKind::Other,
        }
    }

    /// Guess the kind from an error message
    pub fn from_message(message: &str) -> Self {
        let msg = message.to_ascii_lowercase();
        if msg.contains("certificate") || msg.contains("unknownissuer") || msg.contains("certexpired") {
            if msg.contains("expired") {
                NetworkErrorKind::CertificateExpired
            } else {
                NetworkErrorKind::CertificateInvalid
            }
        } else if msg.contains("dns error")
            || msg.contains("failed to lookup address")
            || msg.contains("name or service not known")
            || msg.contains("no such host")
        {
            NetworkErrorKind::DnsFailure
        } else if msg.contains("connection refused") {
            NetworkErrorKind::ConnectionRefused
        } else if msg.contains("connection reset") {
            NetworkErrorKind::ConnectionReset
        } else if msg.contains("timed out") {
            NetworkErrorKind::Timeout
        } else {
            NetworkErrorKind::Other
        }
    }
}

/// Failure reported by a transport
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {text}", status = .response.status, text = .response.status_text)]
    Response { response: TransportResponse },

    /// The request left the client but no response arrived
    #[error("{description}: {message}", description = .kind.description())]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    /// The request could not be built or dispatched
    #[error("Request setup failed: {message}")]
    Setup { message: String },
}

impl TransportError {
    /// Create a network error
    pub fn network(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self::Network {
            kind,
            message: message.into(),
        }
    }

    /// Create a setup error
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup {
            message: message.into(),
        }
    }

    /// The response, when one arrived
    pub fn response(&self) -> Option<&TransportResponse> {
        match self {
            TransportError::Response { response } => Some(response),
            _ => None,
        }
    }
}
