//! Error normalizer module
//!
//! Maps every execution failure onto one of three classes and builds the
//! failed [`QueryResult`](crate::engine::QueryResult) for it.
//!
//! # Classes
//!
//! - **HTTP Response Error**: the server answered with a non-2xx status
//! - **Network Error**: no response arrived (refused, DNS, timeout, reset,
//!   certificate problems)
//! - **Request Setup Error**: the request was never dispatched

mod normalizer;
mod types;

pub use normalizer::{
    create_api_error_response, create_error_response, enhance_error, format_error,
    has_api_error, remote_error_message,
};
pub use types::{EnhancedErrorDetails, ErrorType};

#[cfg(test)]
mod tests;
