//! Standalone query content checks
//!
//! Heuristic checks on query text. The denylist is advisory: it catches
//! obvious accidents, it is not an authorization boundary.

use crate::types::{QueryType, ValidityCheck};
use regex::Regex;
use std::sync::LazyLock;

/// Statement keywords a SQL query may start with
pub const SQL_KEYWORDS: &[&str] = &["SELECT", "SHOW", "DESCRIBE", "DESC", "EXPLAIN", "WITH"];

static SQL_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(?:{})\b", SQL_KEYWORDS.join("|"))).unwrap()
});

static PPL_START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:source\s*=|search\b)").unwrap());

/// Unconditional destructive statements
static DANGEROUS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bDROP\s+(?:TABLE|INDEX|DATABASE)\b",
        r#"(?im)(?:^|;)\s*TRUNCATE\s+(?:TABLE\s+)?[\w.`"-]+"#,
        r#"(?i)\bDELETE\s+FROM\s+[\w.`"-]+\s*(?:;|$)"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Check query text against the content rules for its type
///
/// Empty text and denylisted statements fail for every type; SQL must start
/// with a known statement keyword and PPL with `source=` or `search`. API
/// bodies are not inspected here.
pub fn validate_query_content(query: &str, query_type: QueryType) -> ValidityCheck {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return ValidityCheck::invalid("Query cannot be empty");
    }

    if DANGEROUS_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        return ValidityCheck::invalid("Query contains potentially dangerous operations");
    }

    match query_type {
        QueryType::Sql if !SQL_START_REGEX.is_match(trimmed) => ValidityCheck::invalid(format!(
            "SQL query must start with one of: {}",
            SQL_KEYWORDS.join(", ")
        )),
        QueryType::Ppl if !PPL_START_REGEX.is_match(trimmed) => {
            ValidityCheck::invalid("PPL query must start with 'source=' or 'search'")
        }
        _ => ValidityCheck::ok(),
    }
}
