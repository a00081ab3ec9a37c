//! Block body parsing
//!
//! Configuration bodies hold one `@key = 'value'` assignment per line.
//! Query bodies may start with `@key value` comment lines carrying metadata
//! (`-- @description Top hosts`, `// @method POST`, ...).

use super::types::QueryBlock;
use crate::config::{AuthType, ConnectionOverrides};
use crate::types::{ApiMetadata, Method, OptionStringExt, QueryKind, QueryType};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// `@key = value`, value optionally quoted
static ASSIGNMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*(.*?)\s*$").unwrap()
});

/// Integer with optional `ms` or `s` suffix
static TIMEOUT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)\s*(ms|s)?$").unwrap());

/// Metadata comment: `-- @key value`, `// @key value` or `# @key value`
static METADATA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:--|//|#)\s*@([A-Za-z_]+)\s*[:=]?\s*(.*?)\s*$").unwrap()
});

/// Console-style request line: `POST /index/_search`
static REQUEST_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(GET|POST|PUT|DELETE|HEAD|PATCH)\s+(\S+)$").unwrap()
});

// ============================================================================
// Configuration blocks
// ============================================================================

/// Strip one pair of matching quotes
fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//") || line.starts_with("--")
}

/// Parse a timeout value: bare milliseconds, `<n>ms`, or `<n>s`
pub fn parse_timeout(value: &str) -> Option<u64> {
    let caps = TIMEOUT_REGEX.captures(value.trim())?;
    let amount: u64 = caps[1].parse().ok()?;
    match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(unit) if unit == "s" => amount.checked_mul(1000),
        _ => Some(amount),
    }
}

/// Parse the body of a configuration block into an override layer
///
/// Unknown keys and unparseable values are ignored so older documents keep
/// working when new keys are introduced.
pub fn parse_config_body(content: &str) -> ConnectionOverrides {
    let mut overrides = ConnectionOverrides::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }

        let Some(caps) = ASSIGNMENT_REGEX.captures(line) else {
            debug!(line, "ignoring non-assignment line in configuration block");
            continue;
        };

        let key = caps[1].to_ascii_lowercase().replace('-', "_");
        let Some(value) = unquote(&caps[2]).to_string().none_if_blank() else {
            continue;
        };

        match key.as_str() {
            "endpoint" => overrides.endpoint = Some(value),
            "auth_type" => match value.parse::<AuthType>() {
                Ok(auth_type) => overrides.auth_mut().auth_type = Some(auth_type),
                Err(e) => warn!("ignoring auth_type: {e}"),
            },
            "username" => overrides.auth_mut().username = Some(value),
            "password" => overrides.auth_mut().password = Some(value),
            "api_key" | "apikey" => overrides.auth_mut().api_key = Some(value),
            "timeout" => match parse_timeout(&value) {
                Some(ms) => overrides.timeout = Some(ms),
                None => warn!(value = %value, "ignoring unparseable timeout"),
            },
            other => debug!(key = other, "ignoring unknown configuration key"),
        }
    }

    overrides
}

// ============================================================================
// Query blocks
// ============================================================================

/// Metadata collected from a query block's header and comment lines
#[derive(Debug, Default)]
struct BlockMetadata {
    method: Option<String>,
    endpoint: Option<String>,
    description: Option<String>,
}

impl BlockMetadata {
    /// Fill fields that are still unset
    fn fill(&mut self, method: Option<String>, endpoint: Option<String>) {
        if self.method.is_none() {
            self.method = method;
        }
        if self.endpoint.is_none() {
            self.endpoint = endpoint;
        }
    }
}

/// Read method/endpoint from a fence header such as `POST /index/_doc`
fn header_metadata(header: &str) -> (Option<String>, Option<String>) {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(first), second) if first.parse::<Method>().is_ok() => (
            Some(first.to_ascii_uppercase()),
            second.map(String::from),
        ),
        (Some(first), _) if first.starts_with('/') => (None, Some(first.to_string())),
        _ => (None, None),
    }
}

/// Parse a query block body, extracting leading metadata lines
pub fn parse_query_body(query_type: QueryType, header: &str, content: &str) -> QueryBlock {
    let mut meta = BlockMetadata::default();
    if query_type == QueryType::Api {
        let (method, endpoint) = header_metadata(header);
        meta.fill(method, endpoint);
    }

    let lines: Vec<&str> = content.lines().collect();
    let mut first_body_line = 0;

    let mut comment_method = None;
    let mut comment_endpoint = None;
    for line in &lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            first_body_line += 1;
            continue;
        }
        let Some(caps) = METADATA_REGEX.captures(trimmed) else {
            break;
        };
        let value = caps[2].to_string().none_if_blank();
        match caps[1].to_ascii_lowercase().as_str() {
            "method" => comment_method = value,
            "endpoint" | "path" => comment_endpoint = value,
            "description" | "desc" => meta.description = value,
            other => debug!(key = other, "ignoring unknown query metadata"),
        }
        first_body_line += 1;
    }
    meta.fill(comment_method, comment_endpoint);

    let mut body_lines = &lines[first_body_line..];
    if query_type == QueryType::Api {
        if let Some(caps) = body_lines
            .first()
            .and_then(|line| REQUEST_LINE_REGEX.captures(line.trim()))
        {
            meta.fill(
                Some(caps[1].to_ascii_uppercase()),
                Some(caps[2].to_string()),
            );
            body_lines = &body_lines[1..];
        }
    }

    let body = body_lines.join("\n").trim().to_string();

    let kind = match query_type {
        QueryType::Sql => QueryKind::Sql,
        QueryType::Ppl => QueryKind::Ppl,
        QueryType::Api => QueryKind::Api(ApiMetadata {
            method: meta.method,
            endpoint: meta.endpoint,
        }),
    };

    QueryBlock {
        kind,
        body,
        description: meta.description,
        connection_overrides: None,
        range: None,
    }
}
