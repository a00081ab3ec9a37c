//! Execution engine module
//!
//! Runs one query block end to end: validate, build the request, dispatch it
//! through a [`Transport`], then turn whatever happened into a
//! [`QueryResult`].
//!
//! # Overview
//!
//! ```text
//! Created ─► Validating ──fail──► Failed
//!                │
//!                ▼
//!           Dispatching ──fail──► Failed (normalized)
//!                │
//!                ▼
//!            Succeeded
//! ```
//!
//! There is no retry; a failed attempt is returned as-is. Nothing crosses the
//! engine boundary as an `Err` or a panic.

mod types;

pub use types::{elapsed_ms, ConnectionInfo, QueryResult};

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::normalize::{create_api_error_response, create_error_response, has_api_error};
use crate::parser::QueryBlock;
use crate::request::{
    build_api_request_info, build_auth_headers, build_query_request_info, capture_response_info,
    RequestBody, RequestInfo,
};
use crate::transport::{Transport, TransportError, TransportRequest};
use crate::types::{Headers, QueryKind, QueryLanguage};
use crate::validation::{ValidationContext, ValidationPipeline};
use futures::future::join_all;
use std::time::Instant;
use tracing::{debug, warn};

/// Executes query blocks against a cluster
pub struct QueryExecutor<T: Transport> {
    /// Transport used for every request
    transport: T,
    /// Pre-flight checks
    pipeline: ValidationPipeline,
}

impl<T: Transport> QueryExecutor<T> {
    /// Create an executor around a transport
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            pipeline: ValidationPipeline::new(),
        }
    }

    /// Get the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute a query block
    pub async fn execute(&self, config: &ConnectionConfig, block: &QueryBlock) -> QueryResult {
        self.run(config, block, false).await
    }

    /// Ask the cluster to explain a SQL or PPL block
    pub async fn explain(&self, config: &ConnectionConfig, block: &QueryBlock) -> QueryResult {
        self.run(config, block, true).await
    }

    /// Execute several blocks concurrently
    ///
    /// Results come back in the same order as `blocks`.
    pub async fn execute_all(
        &self,
        config: &ConnectionConfig,
        blocks: &[QueryBlock],
    ) -> Vec<QueryResult> {
        join_all(blocks.iter().map(|block| self.execute(config, block))).await
    }

    async fn run(&self, config: &ConnectionConfig, block: &QueryBlock, is_explain: bool) -> QueryResult {
        let start = Instant::now();

        // Validating
        let ctx = ValidationContext::for_block(block, start);
        let validation = if is_explain {
            self.pipeline.validate_explain_query(&ctx)
        } else {
            self.pipeline.validate_query(&ctx)
        };
        if let Err(failure) = validation {
            debug!("Validation failed ({}): {}", failure.rule, failure.error);
            return failure.into();
        }

        let overrides = block.connection_overrides.as_ref();
        let effective = config.with_overrides(overrides);
        let connection_info = ConnectionInfo::from(&effective);
        let auth_headers = build_auth_headers(&config.auth, overrides);
        let timeout = effective.timeout_duration();

        let info = match build_request_info(block, &auth_headers, is_explain) {
            Ok(info) => info,
            Err(e) => {
                warn!("Failed to build request: {e}");
                let partial = TransportRequest::new(
                    &effective.endpoint,
                    partial_request_info(block, auth_headers),
                    timeout,
                );
                return create_error_response(
                    &TransportError::setup(e.to_string()),
                    Some(&partial),
                    start,
                    None,
                    Some(connection_info),
                );
            }
        };

        // Dispatching
        let request = TransportRequest::new(&effective.endpoint, info, timeout);
        debug!(
            "Dispatching {} query: {} {}",
            block.query_type(),
            request.method(),
            request.url
        );

        let outcome = self.transport.send(&request).await;
        match outcome {
            Ok(response) => {
                let result = QueryResult::success(start)
                    .with_connection_info(Some(connection_info))
                    .with_response_info(Some(capture_response_info(&response)))
                    .with_request_info(Some(request.info))
                    .with_raw_response(Some(response.data));

                let has_error = result.raw_response.as_ref().is_some_and(has_api_error);
                if has_error {
                    let failed = create_api_error_response(result, start);
                    warn!(
                        "Query returned an error payload: {}",
                        failed.error.as_deref().unwrap_or_default()
                    );
                    failed
                } else {
                    debug!("Query succeeded in {}ms", result.execution_time);
                    result
                }
            }
            Err(err) => {
                warn!("Query failed: {err}");
                create_error_response(&err, Some(&request), start, None, Some(connection_info))
            }
        }
    }
}

/// Build the outbound request for a validated block
fn build_request_info(
    block: &QueryBlock,
    auth_headers: &Headers,
    is_explain: bool,
) -> Result<RequestInfo> {
    match &block.kind {
        QueryKind::Sql => Ok(build_query_request_info(
            QueryLanguage::Sql,
            &block.body,
            auth_headers,
            is_explain,
        )),
        QueryKind::Ppl => Ok(build_query_request_info(
            QueryLanguage::Ppl,
            &block.body,
            auth_headers,
            is_explain,
        )),
        QueryKind::Api(_) if is_explain => Err(Error::UnsupportedQueryType {
            query_type: "api".to_string(),
        }),
        QueryKind::Api(metadata) => build_api_request_info(
            metadata.method.as_deref().unwrap_or_default(),
            metadata.endpoint.as_deref().unwrap_or_default(),
            &block.body,
            auth_headers,
        ),
    }
}

/// What was about to be sent when request building failed
fn partial_request_info(block: &QueryBlock, headers: Headers) -> RequestInfo {
    let (method, endpoint) = match &block.kind {
        QueryKind::Api(metadata) => (
            metadata.method.as_deref().unwrap_or_default().to_uppercase(),
            metadata.endpoint.clone().unwrap_or_default(),
        ),
        _ => ("POST".to_string(), String::new()),
    };
    let body = if block.body.trim().is_empty() {
        RequestBody::Empty
    } else {
        RequestBody::Text(block.body.clone())
    };
    RequestInfo {
        method,
        endpoint,
        headers,
        body,
    }
}
