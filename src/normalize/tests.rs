//! Tests for the error normalizer

use super::*;
use crate::config::AuthType;
use crate::engine::{ConnectionInfo, QueryResult};
use crate::request::{RequestBody, RequestInfo, ResponseInfo};
use crate::transport::{NetworkErrorKind, TransportError, TransportRequest, TransportResponse};
use crate::types::Headers;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::{Duration, Instant};

fn response_error(status: u16, status_text: &str, data: serde_json::Value) -> TransportError {
    let mut headers = Headers::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    TransportError::Response {
        response: TransportResponse {
            status,
            status_text: status_text.to_string(),
            headers,
            data,
        },
    }
}

fn sql_request() -> TransportRequest {
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    TransportRequest::new(
        "http://localhost:9200",
        RequestInfo {
            method: "POST".to_string(),
            endpoint: "/_plugins/_sql".to_string(),
            headers,
            body: RequestBody::Text("{\"query\":\"SELECT\"}".to_string()),
        },
        Duration::from_secs(30),
    )
}

fn connection_info() -> ConnectionInfo {
    ConnectionInfo {
        endpoint: "http://localhost:9200".to_string(),
        auth_type: AuthType::None,
    }
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test]
fn test_error_type_classification() {
    assert_eq!(
        ErrorType::of(&response_error(500, "Internal Server Error", json!(null))),
        ErrorType::HttpResponse
    );
    assert_eq!(
        ErrorType::of(&TransportError::network(NetworkErrorKind::DnsFailure, "dns")),
        ErrorType::Network
    );
    assert_eq!(
        ErrorType::of(&TransportError::setup("bad")),
        ErrorType::RequestSetup
    );
}

#[test]
fn test_error_type_serialization() {
    assert_eq!(
        serde_json::to_value(ErrorType::HttpResponse).unwrap(),
        json!("HTTP Response Error")
    );
    assert_eq!(ErrorType::Network.to_string(), "Network Error");
    assert_eq!(ErrorType::RequestSetup.as_str(), "Request Setup Error");
}

// ============================================================================
// format_error Tests
// ============================================================================

#[test]
fn test_format_error_prefers_type_and_reason() {
    let err = response_error(
        400,
        "Bad Request",
        json!({"error": {"type": "parsing_exception", "reason": "Invalid JSON"}, "status": 400}),
    );
    assert_eq!(format_error(&err), "parsing_exception: Invalid JSON");
}

#[test]
fn test_format_error_reason_only() {
    let err = response_error(400, "Bad Request", json!({"error": {"reason": "no reason type"}}));
    assert_eq!(format_error(&err), "no reason type");
}

#[test]
fn test_format_error_string_error() {
    let err = response_error(401, "Unauthorized", json!({"error": "Unauthorized"}));
    assert_eq!(format_error(&err), "Unauthorized");
}

#[test]
fn test_format_error_falls_back_to_status() {
    let err = response_error(503, "Service Unavailable", json!("upstream down"));
    assert_eq!(format_error(&err), "HTTP 503: Service Unavailable");

    let err = response_error(599, "", json!(null));
    assert_eq!(format_error(&err), "HTTP 599");
}

#[test]
fn test_format_error_network_and_setup() {
    let err = TransportError::network(NetworkErrorKind::ConnectionRefused, "refused");
    assert_eq!(
        format_error(&err),
        format!("Network error: {}", NetworkErrorKind::ConnectionRefused.description())
    );

    let err = TransportError::setup("Invalid JSON in request body: eof");
    assert_eq!(format_error(&err), "Invalid JSON in request body: eof");
}

// ============================================================================
// enhance_error Tests
// ============================================================================

#[test]
fn test_enhance_response_error() {
    let err = response_error(
        404,
        "Not Found",
        json!({"error": {"type": "index_not_found_exception", "reason": "no such index"}}),
    );
    let request = sql_request();
    let details = enhance_error(&err, Some(&request));

    assert_eq!(details.error_type, ErrorType::HttpResponse);
    assert_eq!(details.message, "index_not_found_exception: no such index");
    assert_eq!(details.status, Some(404));
    assert_eq!(details.status_text.as_deref(), Some("Not Found"));
    assert_eq!(details.method.as_deref(), Some("POST"));
    assert_eq!(details.url.as_deref(), Some("http://localhost:9200/_plugins/_sql"));
    assert_eq!(details.timeout, Some(30_000));
    assert!(details.request_headers.is_some());
    assert!(details.request_body.is_some());
    assert!(details.response_headers.is_some());
    assert!(details.response_body.is_some());
    assert!(chrono::DateTime::parse_from_rfc3339(&details.timestamp).is_ok());
}

#[test]
fn test_enhance_network_error_has_code() {
    let err = TransportError::network(NetworkErrorKind::Timeout, "operation timed out");
    let details = enhance_error(&err, None);

    assert_eq!(details.error_type, ErrorType::Network);
    assert_eq!(details.code.as_deref(), Some("ETIMEDOUT"));
    assert!(details.message.contains("operation timed out"));
    assert_eq!(details.status, None);
    assert_eq!(details.method, None);
}

#[test]
fn test_enhanced_details_serialize_camel_case() {
    let err = TransportError::network(NetworkErrorKind::DnsFailure, "dns error");
    let value = serde_json::to_value(enhance_error(&err, Some(&sql_request()))).unwrap();

    assert_eq!(value["errorType"], "Network Error");
    assert_eq!(value["code"], "ENOTFOUND");
    assert!(value.get("requestHeaders").is_some());
    assert!(value.get("responseBody").is_none());
}

// ============================================================================
// create_error_response Tests
// ============================================================================

#[test]
fn test_error_response_for_parsing_exception() {
    let err = response_error(
        400,
        "Bad Request",
        json!({"error": {"type": "parsing_exception", "reason": "Invalid JSON"}, "status": 400}),
    );
    let request = sql_request();
    let result = create_error_response(
        &err,
        Some(&request),
        Instant::now(),
        None,
        Some(connection_info()),
    );

    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().contains("parsing_exception"));
    assert_eq!(result.request_info.as_ref().unwrap().endpoint, "/_plugins/_sql");
    assert_eq!(result.status(), Some(400));
    assert_eq!(result.connection_info, Some(connection_info()));
    assert_eq!(
        result.raw_response.unwrap()["error"]["type"],
        "parsing_exception"
    );
}

#[test]
fn test_error_response_synthesizes_details_without_body() {
    let err = TransportError::network(NetworkErrorKind::ConnectionRefused, "connection refused");
    let request = sql_request();
    let result = create_error_response(&err, Some(&request), Instant::now(), None, None);

    assert!(!result.success);
    assert!(result.request_info.is_some());
    assert!(result.response_info.is_none());

    let details = &result.raw_response.unwrap()["error"]["details"];
    assert_eq!(details["errorType"], "Network Error");
    assert_eq!(details["code"], "ECONNREFUSED");
    assert_eq!(details["method"], "POST");
}

#[test]
fn test_error_response_custom_message() {
    let err = TransportError::setup("boom");
    let result = create_error_response(&err, None, Instant::now(), Some("Could not run query"), None);

    assert_eq!(result.error.as_deref(), Some("Could not run query"));
    assert!(result.request_info.is_none());
    assert_eq!(
        result.raw_response.unwrap()["error"]["details"]["errorType"],
        "Request Setup Error"
    );
}

// ============================================================================
// create_api_error_response Tests
// ============================================================================

#[test]
fn test_api_error_response_keeps_diagnostics() {
    let start = Instant::now();
    let ok = QueryResult::success(start)
        .with_connection_info(Some(connection_info()))
        .with_request_info(Some(sql_request().info))
        .with_response_info(Some(ResponseInfo {
            status: 200,
            status_text: "OK".to_string(),
            headers: Headers::new(),
        }))
        .with_raw_response(Some(json!({
            "error": {"type": "SemanticCheckException", "reason": "can't resolve Symbol(x)"}
        })));

    let result = create_api_error_response(ok, start);

    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("SemanticCheckException: can't resolve Symbol(x)")
    );
    assert_eq!(result.status(), Some(200));
    assert!(result.request_info.is_some());
    assert!(result.connection_info.is_some());
    assert!(result.raw_response.is_some());
}

#[test]
fn test_api_error_response_defaults() {
    let start = Instant::now();
    let ok = QueryResult::success(start).with_raw_response(Some(json!({"error": {}})));
    let result = create_api_error_response(ok, start);
    assert_eq!(result.error.as_deref(), Some("Error: Unknown error"));
}

#[test]
fn test_has_api_error() {
    assert!(has_api_error(&json!({"error": {"type": "x", "reason": "y"}})));
    assert!(has_api_error(&json!({"error": "denied"})));
    assert!(!has_api_error(&json!({"errors": false, "items": []})));
    assert!(!has_api_error(&json!({"error": null})));
    assert!(!has_api_error(&json!("plain text")));
}
