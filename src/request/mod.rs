//! Request/response info module
//!
//! Builds outbound requests and captures response metadata.
//!
//! # Features
//!
//! - **Auth Headers**: Basic and ApiKey `Authorization` headers, with
//!   document overrides layered over the base config
//! - **Query Requests**: SQL/PPL (and their explain variants) as POSTs to the
//!   plugin endpoints
//! - **API Requests**: raw REST calls, with NDJSON framing for bulk-style
//!   endpoints

mod auth;
mod builder;
mod types;

pub use auth::build_auth_headers;
pub use builder::{
    build_api_request_info, build_query_request_info, capture_response_info, is_bulk_endpoint,
    process_bulk_body, query_endpoint, validate_json_body, BULK_SEGMENTS,
};
pub use types::{RequestBody, RequestInfo, ResponseInfo, CONTENT_TYPE_JSON, CONTENT_TYPE_NDJSON};
