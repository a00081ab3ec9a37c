//! Fenced block scanning and document-level parsing
//!
//! A document is scanned once for fenced blocks (```` ``` ```` or `~~~`).
//! The first word of a fence's info string selects the block kind; fences
//! with other labels are skipped wholesale so their contents are never
//! mistaken for configuration or queries.

use super::blocks::{parse_config_body, parse_query_body};
use super::types::{BlockRange, ConfigurationBlock, ParsedDocument, QueryBlock};
use crate::config::ConnectionOverrides;
use crate::types::QueryType;
use tracing::debug;

/// Labels accepted for configuration blocks; all are equivalent
pub const CONFIG_BLOCK_LABELS: &[&str] = &[
    "config",
    "connection",
    "opensearch-config",
    "opensearch-connection",
];

const SQL_LABELS: &[&str] = &["sql", "opensearch-sql"];
const PPL_LABELS: &[&str] = &["ppl", "opensearch-ppl"];
const API_LABELS: &[&str] = &["api", "opensearch-api", "rest"];

/// What a fence label selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockLabel {
    Config,
    Query(QueryType),
}

impl BlockLabel {
    pub(crate) fn classify(label: &str) -> Option<Self> {
        let label = label.to_ascii_lowercase();
        let label = label.as_str();
        if CONFIG_BLOCK_LABELS.contains(&label) {
            Some(BlockLabel::Config)
        } else if SQL_LABELS.contains(&label) {
            Some(BlockLabel::Query(QueryType::Sql))
        } else if PPL_LABELS.contains(&label) {
            Some(BlockLabel::Query(QueryType::Ppl))
        } else if API_LABELS.contains(&label) {
            Some(BlockLabel::Query(QueryType::Api))
        } else {
            None
        }
    }
}

/// A fenced block of a recognized kind, before its body is interpreted
#[derive(Debug, Clone)]
pub(crate) struct RawBlock<'a> {
    pub label: BlockLabel,
    /// Info string after the label
    pub header: &'a str,
    pub content: &'a str,
    pub range: BlockRange,
}

/// Opening fence of a block being scanned
struct OpenFence<'a> {
    ch: char,
    len: usize,
    label: Option<BlockLabel>,
    header: &'a str,
    start: usize,
    start_line: usize,
    content_start: usize,
}

/// Parse an opening fence line, returning (fence char, fence length, info string)
fn opening_fence(line: &str) -> Option<(char, usize, &str)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let ch = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = rest.chars().take_while(|c| *c == ch).count();
    if len < 3 {
        return None;
    }
    let info = rest[len..].trim();
    if ch == '`' && info.contains('`') {
        return None;
    }
    Some((ch, len, info))
}

fn is_closing_fence(line: &str, ch: char, min_len: usize) -> bool {
    let trimmed = line.trim();
    let len = trimmed.chars().take_while(|c| *c == ch).count();
    len >= min_len && len == trimmed.chars().count()
}

/// Scan a document for fenced blocks of recognized kinds, in document order
pub(crate) fn scan_blocks(doc: &str) -> Vec<RawBlock<'_>> {
    let mut blocks = Vec::new();
    let mut open: Option<OpenFence<'_>> = None;
    let mut offset = 0;

    for (line_no, raw_line) in doc.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += raw_line.len();
        let line = raw_line.trim_end_matches(['\n', '\r']);

        match open.take() {
            None => {
                if let Some((ch, len, info)) = opening_fence(line) {
                    let (label, header) = match info.split_once(char::is_whitespace) {
                        Some((label, header)) => (label, header.trim()),
                        None => (info, ""),
                    };
                    open = Some(OpenFence {
                        ch,
                        len,
                        label: BlockLabel::classify(label),
                        header,
                        start: line_start,
                        start_line: line_no,
                        content_start: offset,
                    });
                }
            }
            Some(fence) => {
                if is_closing_fence(line, fence.ch, fence.len) {
                    if let Some(label) = fence.label {
                        blocks.push(RawBlock {
                            label,
                            header: fence.header,
                            content: &doc[fence.content_start..line_start],
                            range: BlockRange {
                                start: fence.start,
                                end: line_start + line.len(),
                                start_line: fence.start_line,
                                end_line: line_no,
                            },
                        });
                    }
                } else {
                    open = Some(fence);
                }
            }
        }
    }

    // An unclosed fence runs to the end of the document
    if let Some(fence) = open {
        if let Some(label) = fence.label {
            let content_start = fence.content_start.min(doc.len());
            blocks.push(RawBlock {
                label,
                header: fence.header,
                content: &doc[content_start..],
                range: BlockRange {
                    start: fence.start,
                    end: doc.len(),
                    start_line: fence.start_line,
                    end_line: doc.lines().count().saturating_sub(1),
                },
            });
        }
    }

    blocks
}

/// Parse every configuration block in the document, in document order
pub fn parse_configuration_blocks(doc: &str) -> Vec<ConfigurationBlock> {
    scan_blocks(doc)
        .into_iter()
        .filter(|block| block.label == BlockLabel::Config)
        .map(|block| ConfigurationBlock {
            config: parse_config_body(block.content),
            range: block.range,
        })
        .collect()
}

/// Parse every query block, each paired with the overrides in effect
///
/// A query block receives the config of the nearest configuration block
/// above it, or `None` when no configuration block precedes it. A new
/// configuration block replaces the previous one entirely; overrides from
/// different blocks are never merged.
pub fn parse_document_with_overrides(doc: &str) -> Vec<QueryBlock> {
    parse_document(doc).query_blocks
}

/// Parse configuration and query blocks in a single pass
pub fn parse_document(doc: &str) -> ParsedDocument {
    let mut parsed = ParsedDocument::default();
    let mut current: Option<ConnectionOverrides> = None;

    for block in scan_blocks(doc) {
        match block.label {
            BlockLabel::Config => {
                let config = parse_config_body(block.content);
                debug!(
                    line = block.range.start_line,
                    "configuration block replaces active overrides"
                );
                current = Some(config.clone());
                parsed.configuration_blocks.push(ConfigurationBlock {
                    range: block.range,
                    config,
                });
            }
            BlockLabel::Query(query_type) => {
                let mut query = parse_query_body(query_type, block.header, block.content);
                query.connection_overrides = current.clone();
                query.range = Some(block.range);
                parsed.query_blocks.push(query);
            }
        }
    }

    parsed
}
