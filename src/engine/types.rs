//! Engine types
//!
//! [`QueryResult`] is the single outcome shape for every execution path.

use crate::config::{AuthType, ConnectionConfig};
use crate::request::{RequestInfo, ResponseInfo};
use crate::types::JsonValue;
use crate::validation::ValidationFailure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Milliseconds elapsed since `start`
pub fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Where a query was sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub endpoint: String,
    pub auth_type: AuthType,
}

impl From<&ConnectionConfig> for ConnectionInfo {
    fn from(config: &ConnectionConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            auth_type: config.auth.auth_type,
        }
    }
}

/// Outcome of one execution, successful or not
///
/// Connection, request and response info are attached whenever they were
/// available, including on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Milliseconds from start of validation to completion
    pub execution_time: u64,
    pub executed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_info: Option<ConnectionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_info: Option<RequestInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_info: Option<ResponseInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<JsonValue>,
}

impl QueryResult {
    /// A successful result, timed from `start`
    pub fn success(start: Instant) -> Self {
        Self {
            success: true,
            error: None,
            execution_time: elapsed_ms(start),
            executed_at: Utc::now(),
            connection_info: None,
            request_info: None,
            response_info: None,
            raw_response: None,
        }
    }

    /// A failed result, timed from `start`
    pub fn failure(error: impl Into<String>, start: Instant) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::success(start)
        }
    }

    /// Attach connection info
    #[must_use]
    pub fn with_connection_info(mut self, info: Option<ConnectionInfo>) -> Self {
        self.connection_info = info;
        self
    }

    /// Attach request info
    #[must_use]
    pub fn with_request_info(mut self, info: Option<RequestInfo>) -> Self {
        self.request_info = info;
        self
    }

    /// Attach response info
    #[must_use]
    pub fn with_response_info(mut self, info: Option<ResponseInfo>) -> Self {
        self.response_info = info;
        self
    }

    /// Attach the raw response body
    #[must_use]
    pub fn with_raw_response(mut self, raw: Option<JsonValue>) -> Self {
        self.raw_response = raw;
        self
    }

    /// HTTP status of the response, if one arrived
    pub fn status(&self) -> Option<u16> {
        self.response_info.as_ref().map(|r| r.status)
    }
}

impl From<ValidationFailure> for QueryResult {
    fn from(failure: ValidationFailure) -> Self {
        Self {
            success: false,
            error: Some(failure.error),
            execution_time: failure.execution_time,
            executed_at: Utc::now(),
            connection_info: None,
            request_info: None,
            response_info: None,
            raw_response: None,
        }
    }
}
