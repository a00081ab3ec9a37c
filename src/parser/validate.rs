//! Structural validation of parsed query blocks

use crate::types::{QueryKind, ValidityCheck};

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

/// Check that a query carries what its kind needs to be executed
///
/// API operations need a method and an endpoint; SQL and PPL need non-empty
/// text. Query language syntax is left to the remote engine.
pub fn validate_query(query: &str, kind: &QueryKind) -> ValidityCheck {
    match kind {
        QueryKind::Api(metadata) => {
            if is_blank(metadata.method.as_deref()) {
                return ValidityCheck::invalid("API operation requires HTTP method");
            }
            if is_blank(metadata.endpoint.as_deref()) {
                return ValidityCheck::invalid("API operation requires endpoint");
            }
            ValidityCheck::ok()
        }
        QueryKind::Sql | QueryKind::Ppl => {
            if query.trim().is_empty() {
                ValidityCheck::invalid("Query cannot be empty")
            } else {
                ValidityCheck::ok()
            }
        }
    }
}
