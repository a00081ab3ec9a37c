//! Validation types

use crate::config::ConnectionOverrides;
use crate::parser::QueryBlock;
use crate::types::{QueryKind, QueryType};
use serde::Serialize;
use std::time::Instant;

/// Everything a validation rule may look at
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    pub query: &'a str,
    pub kind: &'a QueryKind,
    pub connection_overrides: Option<&'a ConnectionOverrides>,
    pub start_time: Instant,
}

impl<'a> ValidationContext<'a> {
    /// Create a context starting now
    pub fn new(query: &'a str, kind: &'a QueryKind) -> Self {
        Self {
            query,
            kind,
            connection_overrides: None,
            start_time: Instant::now(),
        }
    }

    /// Build a context for a query block
    pub fn for_block(block: &'a QueryBlock, start_time: Instant) -> Self {
        Self {
            query: &block.body,
            kind: &block.kind,
            connection_overrides: block.connection_overrides.as_ref(),
            start_time,
        }
    }

    /// Attach connection overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: &'a ConnectionOverrides) -> Self {
        self.connection_overrides = Some(overrides);
        self
    }

    /// The plain kind tag
    pub fn query_type(&self) -> QueryType {
        self.kind.query_type()
    }
}

/// A rule violation, reported before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    /// Always `false`
    pub success: bool,
    pub error: String,
    /// Milliseconds since the context was created
    pub execution_time: u64,
    /// Name of the rule that failed
    #[serde(skip)]
    pub rule: &'static str,
}

impl ValidationFailure {
    pub(crate) fn new(rule: &'static str, error: String, start_time: Instant) -> Self {
        Self {
            success: false,
            error,
            execution_time: start_time.elapsed().as_millis() as u64,
            rule,
        }
    }
}

/// Signature shared by all rules
pub type RuleCheck = fn(&ValidationContext<'_>) -> Result<(), String>;

/// A named, pure validation rule
#[derive(Clone, Copy)]
pub struct ValidationRule {
    pub name: &'static str,
    pub check: RuleCheck,
}

impl std::fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ValidationRule {
    /// Run the rule against a context
    pub fn apply(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationFailure> {
        (self.check)(ctx).map_err(|error| ValidationFailure::new(self.name, error, ctx.start_time))
    }
}
