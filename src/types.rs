//! Common types used throughout docquery
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Header map with a stable iteration order, so diagnostics render deterministically
pub type Headers = BTreeMap<String, String>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method accepted for API operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
}

impl Method {
    /// All accepted methods, in display order
    pub const ALL: [Method; 6] = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::HEAD,
        Method::PATCH,
    ];

    /// Canonical upper-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| crate::Error::invalid_value("method", format!("unknown HTTP method '{s}'")))
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
            Method::HEAD => reqwest::Method::HEAD,
        }
    }
}

// ============================================================================
// Query Types
// ============================================================================

/// The kind tag of a query block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// SQL query, sent to the SQL plugin
    Sql,
    /// Piped Processing Language query, sent to the PPL plugin
    Ppl,
    /// Raw REST call against the search engine
    Api,
}

impl QueryType {
    /// Lower-case name
    pub fn as_str(self) -> &'static str {
        match self {
            QueryType::Sql => "sql",
            QueryType::Ppl => "ppl",
            QueryType::Api => "api",
        }
    }

    /// The query language, if this is not a raw API call
    pub fn language(self) -> Option<QueryLanguage> {
        match self {
            QueryType::Sql => Some(QueryLanguage::Sql),
            QueryType::Ppl => Some(QueryLanguage::Ppl),
            QueryType::Api => None,
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query languages executed through a plugin endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryLanguage {
    Sql,
    Ppl,
}

impl From<QueryLanguage> for QueryType {
    fn from(language: QueryLanguage) -> Self {
        match language {
            QueryLanguage::Sql => QueryType::Sql,
            QueryLanguage::Ppl => QueryType::Ppl,
        }
    }
}

/// Method and endpoint of an API operation, as written in the document
///
/// Both fields are optional at parse time; validation rejects API blocks
/// that are missing either.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl ApiMetadata {
    /// Create metadata with both method and endpoint set
    pub fn new(method: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            endpoint: Some(endpoint.into()),
        }
    }
}

/// A query together with the metadata only its kind carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QueryKind {
    Sql,
    Ppl,
    Api(ApiMetadata),
}

impl QueryKind {
    /// The plain kind tag
    pub fn query_type(&self) -> QueryType {
        match self {
            QueryKind::Sql => QueryType::Sql,
            QueryKind::Ppl => QueryType::Ppl,
            QueryKind::Api(_) => QueryType::Api,
        }
    }

    /// API metadata, for API operations only
    pub fn api_metadata(&self) -> Option<&ApiMetadata> {
        match self {
            QueryKind::Api(metadata) => Some(metadata),
            _ => None,
        }
    }
}

// ============================================================================
// Validity Check
// ============================================================================

/// Outcome of a structural check that does not touch the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityCheck {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidityCheck {
    /// A passing check
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    /// A failing check with a reason
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }

    /// Convert into a `Result`, carrying the reason on failure
    pub fn into_result(self) -> Result<(), String> {
        if self.valid {
            Ok(())
        } else {
            Err(self.error.unwrap_or_else(|| "Validation failed".to_string()))
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty or whitespace-only
    fn none_if_blank(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_blank(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_blank(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
