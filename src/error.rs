//! Error types for docquery
//!
//! This module defines the error hierarchy used by the internal helpers
//! (body validation, configuration loading).
//! The execution engine never surfaces these directly: every failure is
//! folded into a [`QueryResult`](crate::engine::QueryResult).

use thiserror::Error;

/// The main error type for docquery
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Request Building Errors
    // ============================================================================
    #[error("Invalid JSON in request body: {message}")]
    InvalidJsonBody { message: String },

    #[error("Invalid JSON on line {line_number} of bulk body: {line}")]
    InvalidBulkLine { line_number: usize, line: String },

    #[error("Invalid NDJSON on line {line_number}: {message}")]
    InvalidNdjson { line_number: usize, message: String },

    #[error("Unsupported query type for this operation: {query_type}")]
    UnsupportedQueryType { query_type: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid JSON body error
    pub fn invalid_json_body(message: impl Into<String>) -> Self {
        Self::InvalidJsonBody {
            message: message.into(),
        }
    }

    /// Create an invalid bulk line error
    pub fn invalid_bulk_line(line_number: usize, line: impl Into<String>) -> Self {
        Self::InvalidBulkLine {
            line_number,
            line: line.into(),
        }
    }
}

/// Result type alias for docquery
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
