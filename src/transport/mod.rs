//! Transport module
//!
//! The transport is the only suspension point in the crate. The execution
//! engine talks to it through the [`Transport`] trait so tests (and callers
//! with their own HTTP stack) can substitute it.
//!
//! # Features
//!
//! - **No Retries**: a failed attempt is reported as-is
//! - **Preformatted Bodies**: NDJSON bodies are sent byte for byte
//! - **Classified Failures**: explicit [`TransportError`] variants instead of
//!   probing error shapes

mod client;
mod types;

pub use client::{classify_error, ReqwestTransport};
pub use types::{
    build_url, parse_response_data, NetworkErrorKind, TransportError, TransportRequest,
    TransportResponse,
};

use async_trait::async_trait;

/// Sends a request and reports the response or a classified failure
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a single request
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}
