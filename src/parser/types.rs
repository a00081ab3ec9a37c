//! Document parser types
//!
//! Value objects produced by parsing a document. Nothing here is shared or
//! mutated after parsing.

use crate::config::ConnectionOverrides;
use crate::types::{ApiMetadata, QueryKind, QueryType};
use serde::{Deserialize, Serialize};

/// Location of a fenced block in the source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    /// Byte offset of the opening fence
    pub start: usize,
    /// Byte offset just past the closing fence (or end of document)
    pub end: usize,
    /// 0-based line of the opening fence
    pub start_line: usize,
    /// 0-based line of the closing fence
    pub end_line: usize,
}

/// A parsed configuration block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationBlock {
    pub range: BlockRange,
    pub config: ConnectionOverrides,
}

/// A parsed query block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBlock {
    /// Query kind, carrying API metadata for API operations
    pub kind: QueryKind,
    /// Query text (SQL/PPL) or request body (API)
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Overrides from the nearest preceding configuration block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_overrides: Option<ConnectionOverrides>,
    /// Location in the document; `None` for blocks built directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<BlockRange>,
}

impl QueryBlock {
    /// Create a block of the given kind
    pub fn new(kind: QueryKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
            description: None,
            connection_overrides: None,
            range: None,
        }
    }

    /// Create a SQL block
    pub fn sql(query: impl Into<String>) -> Self {
        Self::new(QueryKind::Sql, query)
    }

    /// Create a PPL block
    pub fn ppl(query: impl Into<String>) -> Self {
        Self::new(QueryKind::Ppl, query)
    }

    /// Create an API operation block
    pub fn api(method: impl Into<String>, endpoint: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(QueryKind::Api(ApiMetadata::new(method, endpoint)), body)
    }

    /// Attach connection overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConnectionOverrides) -> Self {
        self.connection_overrides = Some(overrides);
        self
    }

    /// Attach a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The plain kind tag
    pub fn query_type(&self) -> QueryType {
        self.kind.query_type()
    }
}

/// Everything found in one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    pub configuration_blocks: Vec<ConfigurationBlock>,
    pub query_blocks: Vec<QueryBlock>,
}
