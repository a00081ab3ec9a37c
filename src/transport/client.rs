//! reqwest-backed transport
//!
//! Sends one request, without retries, and maps every failure onto
//! [`TransportError`]:
//! - non-2xx responses become `Response`, body included
//! - connection-level failures become `Network`, classified by walking the
//!   error source chain
//! - requests that cannot be built become `Setup`

use super::types::{
    parse_response_data, NetworkErrorKind, TransportError, TransportRequest, TransportResponse,
};
use super::Transport;
use crate::error::Result;
use crate::types::{Headers, Method as HttpMethod};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::error::Error as StdError;
use tracing::debug;

/// Transport backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a default client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("docquery/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Create a transport around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let method: HttpMethod = request
            .method()
            .parse()
            .map_err(|e: crate::Error| TransportError::setup(e.to_string()))?;

        let mut req = self.client.request(method.into(), &request.url);

        for (key, value) in &request.info.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        // Bodies are already serialized; NDJSON goes out byte for byte
        if let Some(body) = request.info.body.to_wire() {
            req = req.body(body);
        }

        if !request.timeout.is_zero() {
            req = req.timeout(request.timeout);
        }

        debug!("Sending {} {}", request.method(), request.url);

        let response = req.send().await.map_err(|e| classify_error(&e))?;
        let response = read_response(response).await?;

        if response.is_success() {
            debug!("Request succeeded: {} {}", request.method(), request.url);
            Ok(response)
        } else {
            Err(TransportError::Response { response })
        }
    }
}

async fn read_response(
    response: Response,
) -> std::result::Result<TransportResponse, TransportError> {
    let status = response.status();

    let mut headers = Headers::new();
    for (name, value) in response.headers() {
        if let Ok(value) = value.to_str() {
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
    }

    let text = response.text().await.map_err(|e| classify_error(&e))?;

    Ok(TransportResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        headers,
        data: parse_response_data(&text),
    })
}

/// Map a reqwest failure onto the transport error taxonomy
pub fn classify_error(err: &reqwest::Error) -> TransportError {
    if err.is_builder() {
        return TransportError::setup(err.to_string());
    }

    let kind = if err.is_timeout() {
        NetworkErrorKind::Timeout
    } else {
        network_kind(err)
    };

    TransportError::network(kind, error_chain_message(err))
}

/// Walk the source chain for the most specific cause
fn network_kind(err: &(dyn StdError + 'static)) -> NetworkErrorKind {
    let mut source = Some(err);
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            match io.kind() {
                std::io::ErrorKind::ConnectionRefused => return NetworkErrorKind::ConnectionRefused,
                std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted => {
                    return NetworkErrorKind::ConnectionReset
                }
                std::io::ErrorKind::TimedOut => return NetworkErrorKind::Timeout,
                _ => {}
            }
        }

        let kind = NetworkErrorKind::from_message(&e.to_string());
        if kind != NetworkErrorKind::Other {
            return kind;
        }

        source = e.source();
    }
    NetworkErrorKind::Other
}

/// Join an error and its causes into one line
fn error_chain_message(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(e) = source {
        let text = e.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        source = e.source();
    }
    parts.join(": ")
}
