//! Failure classification and result construction

use super::types::{EnhancedErrorDetails, ErrorType};
use crate::engine::{elapsed_ms, ConnectionInfo, QueryResult};
use crate::request::capture_response_info;
use crate::transport::{TransportError, TransportRequest};
use crate::types::JsonValue;
use chrono::Utc;
use serde_json::json;
use std::time::Instant;

/// The remote's own explanation of a failure, if the body carries one
///
/// Prefers `error.type: error.reason`, then either field alone, then a plain
/// string `error`.
pub fn remote_error_message(data: &JsonValue) -> Option<String> {
    match data.get("error")? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.clone()),
        JsonValue::Object(obj) => {
            let kind = obj.get("type").and_then(JsonValue::as_str);
            let reason = obj.get("reason").and_then(JsonValue::as_str);
            match (kind, reason) {
                (Some(kind), Some(reason)) => Some(format!("{kind}: {reason}")),
                (None, Some(reason)) => Some(reason.to_string()),
                (Some(kind), None) => Some(kind.to_string()),
                (None, None) => None,
            }
        }
        _ => None,
    }
}

/// Whether a 2xx payload encodes an application-level error
pub fn has_api_error(data: &JsonValue) -> bool {
    matches!(
        data.get("error"),
        Some(JsonValue::Object(_) | JsonValue::String(_))
    )
}

/// Short single-line message for a failure
pub fn format_error(error: &TransportError) -> String {
    match error {
        TransportError::Response { response } => remote_error_message(&response.data)
            .unwrap_or_else(|| {
                if response.status_text.is_empty() {
                    format!("HTTP {}", response.status)
                } else {
                    format!("HTTP {}: {}", response.status, response.status_text)
                }
            }),
        TransportError::Network { kind, .. } => format!("Network error: {}", kind.description()),
        TransportError::Setup { message } => message.clone(),
    }
}

/// Classify a failure and collect every diagnostic available for it
pub fn enhance_error(
    error: &TransportError,
    request: Option<&TransportRequest>,
) -> EnhancedErrorDetails {
    let error_type = ErrorType::of(error);

    let (message, code) = match error {
        TransportError::Response { .. } => (format_error(error), None),
        TransportError::Network { kind, .. } => (error.to_string(), Some(kind.code().to_string())),
        TransportError::Setup { message } => (message.clone(), None),
    };

    let response = error.response();

    EnhancedErrorDetails {
        error_type,
        message,
        timestamp: Utc::now().to_rfc3339(),
        code,
        status: response.map(|r| r.status),
        status_text: response.map(|r| r.status_text.clone()),
        method: request.map(|r| r.method().to_string()),
        url: request.map(|r| r.url.clone()),
        timeout: request.map(TransportRequest::timeout_ms),
        request_headers: request.map(|r| r.info.headers.clone()),
        request_body: request
            .filter(|r| !r.info.body.is_empty())
            .map(|r| r.info.body.to_json()),
        response_headers: response.map(|r| r.headers.clone()),
        response_body: response.filter(|r| !r.data.is_null()).map(|r| r.data.clone()),
    }
}

/// Build the failed result for a transport or setup failure
///
/// Request and response info are attached when available. When the remote
/// sent no body, `raw_response` carries `{"error": {"details": ...}}` so the
/// caller always has something to show.
pub fn create_error_response(
    error: &TransportError,
    request: Option<&TransportRequest>,
    start_time: Instant,
    custom_message: Option<&str>,
    connection_info: Option<ConnectionInfo>,
) -> QueryResult {
    let message = custom_message.map_or_else(|| format_error(error), str::to_string);
    let response = error.response();

    let raw_response = match response {
        Some(response) if !response.data.is_null() => response.data.clone(),
        _ => {
            let details = serde_json::to_value(enhance_error(error, request)).unwrap_or_default();
            json!({ "error": { "details": details } })
        }
    };

    QueryResult::failure(message, start_time)
        .with_connection_info(connection_info)
        .with_request_info(request.map(|r| r.info.clone()))
        .with_response_info(response.map(capture_response_info))
        .with_raw_response(Some(raw_response))
}

/// Turn a transport-level success whose payload is an error into a failure
///
/// The message is `"<type>: <reason>"`. Connection, request and response info
/// already on `result` are kept.
pub fn create_api_error_response(result: QueryResult, start_time: Instant) -> QueryResult {
    let message = match result.raw_response.as_ref().and_then(|r| r.get("error")) {
        Some(JsonValue::Object(obj)) => {
            let kind = obj.get("type").and_then(JsonValue::as_str).unwrap_or("Error");
            let reason = obj
                .get("reason")
                .and_then(JsonValue::as_str)
                .unwrap_or("Unknown error");
            format!("{kind}: {reason}")
        }
        Some(JsonValue::String(s)) => s.clone(),
        _ => "Unknown error".to_string(),
    };

    QueryResult {
        success: false,
        error: Some(message),
        execution_time: elapsed_ms(start_time),
        ..result
    }
}
