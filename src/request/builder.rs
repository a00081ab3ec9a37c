//! Request construction
//!
//! Turns a validated query into a [`RequestInfo`]. Bulk-style endpoints get
//! NDJSON framing; everything else is a single JSON document.

use super::types::{RequestBody, RequestInfo, ResponseInfo, CONTENT_TYPE_JSON, CONTENT_TYPE_NDJSON};
use crate::error::{Error, Result};
use crate::json::{format_json, is_valid_json, parse_json};
use crate::transport::TransportResponse;
use crate::types::{Headers, QueryLanguage};
use serde_json::{json, Value};

/// Path segments that mark a multi-document NDJSON operation
pub const BULK_SEGMENTS: &[&str] = &["_bulk", "_msearch"];

const SQL_ENDPOINT: &str = "/_plugins/_sql";
const SQL_EXPLAIN_ENDPOINT: &str = "/_plugins/_sql/_explain";
const PPL_ENDPOINT: &str = "/_plugins/_ppl";
const PPL_EXPLAIN_ENDPOINT: &str = "/_plugins/_ppl/_explain";

/// Plugin endpoint for a query language
pub fn query_endpoint(language: QueryLanguage, is_explain: bool) -> &'static str {
    match (language, is_explain) {
        (QueryLanguage::Sql, false) => SQL_ENDPOINT,
        (QueryLanguage::Sql, true) => SQL_EXPLAIN_ENDPOINT,
        (QueryLanguage::Ppl, false) => PPL_ENDPOINT,
        (QueryLanguage::Ppl, true) => PPL_EXPLAIN_ENDPOINT,
    }
}

/// Whether an endpoint takes an NDJSON body
pub fn is_bulk_endpoint(endpoint: &str) -> bool {
    BULK_SEGMENTS.iter().any(|segment| endpoint.contains(segment))
}

fn with_content_type(auth_headers: &Headers, content_type: &str) -> Headers {
    let mut headers = auth_headers.clone();
    headers.insert("Content-Type".to_string(), content_type.to_string());
    headers
}

/// Build a SQL or PPL request
pub fn build_query_request_info(
    language: QueryLanguage,
    query: &str,
    auth_headers: &Headers,
    is_explain: bool,
) -> RequestInfo {
    RequestInfo {
        method: "POST".to_string(),
        endpoint: query_endpoint(language, is_explain).to_string(),
        headers: with_content_type(auth_headers, CONTENT_TYPE_JSON),
        body: RequestBody::Text(format_json(&json!({ "query": query }))),
    }
}

/// Build a raw API request
///
/// Relative endpoints are rooted at `/`; absolute URLs are kept as written
/// and bypass the connection endpoint. The body is framed as NDJSON for
/// bulk-style endpoints and parsed as one JSON document otherwise. A blank
/// body is sent as no body.
pub fn build_api_request_info(
    method: &str,
    endpoint: &str,
    body: &str,
    auth_headers: &Headers,
) -> Result<RequestInfo> {
    let absolute = endpoint.starts_with("http://") || endpoint.starts_with("https://");
    let endpoint = if absolute || endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{endpoint}")
    };
    let bulk = is_bulk_endpoint(&endpoint);

    let body = if body.trim().is_empty() {
        RequestBody::Empty
    } else if bulk {
        RequestBody::Ndjson(process_bulk_body(body)?)
    } else {
        RequestBody::Json(validate_json_body(body)?)
    };

    let content_type = if bulk { CONTENT_TYPE_NDJSON } else { CONTENT_TYPE_JSON };

    Ok(RequestInfo {
        method: method.trim().to_ascii_uppercase(),
        endpoint,
        headers: with_content_type(auth_headers, content_type),
        body,
    })
}

/// Normalize a bulk body into NDJSON
///
/// Every non-blank line must be a JSON document on its own. The result ends
/// with exactly one newline, so applying this twice changes nothing.
pub fn process_bulk_body(body: &str) -> Result<String> {
    let trimmed = body.trim();

    for (index, line) in trimmed.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if !is_valid_json(line) {
            return Err(Error::invalid_bulk_line(index + 1, line));
        }
    }

    Ok(format!("{trimmed}\n"))
}

/// Parse a non-bulk body as a single JSON document
pub fn validate_json_body(body: &str) -> Result<Value> {
    parse_json(body).map_err(|e| match e {
        Error::JsonParse(inner) => Error::invalid_json_body(inner.to_string()),
        other => other,
    })
}

/// Capture status and headers of a response for diagnostics
pub fn capture_response_info(response: &TransportResponse) -> ResponseInfo {
    ResponseInfo {
        status: response.status,
        status_text: response.status_text.clone(),
        headers: response.headers.clone(),
    }
}
