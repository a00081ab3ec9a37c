//! JSON and NDJSON helpers
//!
//! Pure parse/validate/format functions for single JSON documents and for
//! newline-delimited batches (one document per line).

use crate::error::{Error, Result};
use serde_json::Value;

// ============================================================================
// JSON
// ============================================================================

/// Parse a single JSON document
pub fn parse_json(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Check whether text is one well-formed JSON document
pub fn is_valid_json(text: &str) -> bool {
    serde_json::from_str::<Value>(text).is_ok()
}

/// Pretty-print a JSON value with two-space indentation
pub fn format_json(value: &Value) -> String {
    // Serializing a `Value` cannot fail
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

// ============================================================================
// NDJSON
// ============================================================================

/// Parse newline-delimited JSON, skipping blank lines
pub fn parse_ndjson(text: &str) -> Result<Vec<Value>> {
    let mut documents = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line).map_err(|e| Error::InvalidNdjson {
            line_number: line_num + 1,
            message: format!("{e} in '{line}'"),
        })?;

        documents.push(value);
    }

    Ok(documents)
}

/// Check whether every non-blank line is a JSON document
pub fn is_valid_ndjson(text: &str) -> bool {
    parse_ndjson(text).is_ok()
}

/// Serialize documents one per line, terminated by a single newline
pub fn format_ndjson(values: &[Value]) -> String {
    let mut out = String::new();
    for value in values {
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out
}
