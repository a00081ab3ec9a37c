//! Rule sets and the pipeline that runs them
//!
//! Rules are grouped into named sets and concatenated per call path:
//!
//! - `validate_query`: common, then API-specific rules for API operations
//! - `validate_explain_query`: explain target, then common
//!
//! The first failing rule wins, so set order decides which error surfaces
//! when several are violated.

use super::types::{ValidationContext, ValidationFailure, ValidationRule};
use crate::config::validate_connection_overrides;
use crate::parser::validate_query;
use crate::types::{Method, QueryKind};

/// Message returned when explain is requested for an API operation
pub const EXPLAIN_UNSUPPORTED: &str = "Explain is only supported for SQL and PPL queries.";

// ============================================================================
// Rules
// ============================================================================

fn check_connection_overrides(ctx: &ValidationContext<'_>) -> Result<(), String> {
    match ctx.connection_overrides {
        Some(overrides) => validate_connection_overrides(overrides)
            .into_result()
            .map_err(|e| format!("Invalid connection overrides: {e}")),
        None => Ok(()),
    }
}

fn check_query_syntax(ctx: &ValidationContext<'_>) -> Result<(), String> {
    validate_query(ctx.query, ctx.kind).into_result()
}

fn check_http_method(ctx: &ValidationContext<'_>) -> Result<(), String> {
    let QueryKind::Api(metadata) = ctx.kind else {
        return Ok(());
    };
    match metadata.method.as_deref() {
        Some(method) if method.parse::<Method>().is_err() => {
            let allowed: Vec<&str> = Method::ALL.iter().map(|m| m.as_str()).collect();
            Err(format!(
                "Invalid HTTP method: {method}. Supported methods: {}",
                allowed.join(", ")
            ))
        }
        _ => Ok(()),
    }
}

fn check_explain_target(ctx: &ValidationContext<'_>) -> Result<(), String> {
    if ctx.query_type().language().is_some() {
        Ok(())
    } else {
        Err(EXPLAIN_UNSUPPORTED.to_string())
    }
}

// ============================================================================
// Rule sets
// ============================================================================

/// Rules applied to every execution: overrides first, then syntax
pub const COMMON_RULES: &[ValidationRule] = &[
    ValidationRule {
        name: "connection_overrides",
        check: check_connection_overrides,
    },
    ValidationRule {
        name: "query_syntax",
        check: check_query_syntax,
    },
];

/// Rules applied to API operations after the common rules
pub const API_RULES: &[ValidationRule] = &[ValidationRule {
    name: "http_method",
    check: check_http_method,
}];

/// Rules applied before the common rules when explaining a query
pub const EXPLAIN_RULES: &[ValidationRule] = &[ValidationRule {
    name: "explain_target",
    check: check_explain_target,
}];

// ============================================================================
// Pipeline
// ============================================================================

/// Stateless validation pipeline
///
/// Safe to share across concurrent executions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationPipeline;

impl ValidationPipeline {
    /// Create a pipeline
    pub fn new() -> Self {
        Self
    }

    /// Run rules in order, stopping at the first failure
    pub fn run<'r>(
        &self,
        rules: impl IntoIterator<Item = &'r ValidationRule>,
        ctx: &ValidationContext<'_>,
    ) -> Result<(), ValidationFailure> {
        rules.into_iter().try_for_each(|rule| rule.apply(ctx))
    }

    /// Validate a query before execution
    pub fn validate_query(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationFailure> {
        let api_rules: &[ValidationRule] = match ctx.kind {
            QueryKind::Api(_) => API_RULES,
            _ => &[],
        };
        self.run(COMMON_RULES.iter().chain(api_rules), ctx)
    }

    /// Validate a query before an explain request
    pub fn validate_explain_query(
        &self,
        ctx: &ValidationContext<'_>,
    ) -> Result<(), ValidationFailure> {
        self.run(EXPLAIN_RULES.iter().chain(COMMON_RULES), ctx)
    }
}
