//! Validation pipeline module
//!
//! Checks a query, its metadata and its connection overrides before any
//! request is built.
//!
//! # Overview
//!
//! - [`ValidationPipeline`] runs ordered rule sets and stops at the first
//!   failure, returning a [`ValidationFailure`]
//! - [`validate_query_content`] is a deeper, standalone content check that
//!   is not part of the execution path

mod content;
mod rules;
mod types;

pub use content::{validate_query_content, SQL_KEYWORDS};
pub use rules::{ValidationPipeline, API_RULES, COMMON_RULES, EXPLAIN_RULES, EXPLAIN_UNSUPPORTED};
pub use types::{RuleCheck, ValidationContext, ValidationFailure, ValidationRule};
