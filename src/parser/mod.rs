//! Document parser module
//!
//! Extracts configuration blocks and query blocks from Markdown text.
//!
//! # Overview
//!
//! - Configuration blocks (```` ```config ````, ```` ```connection ````,
//!   ```` ```opensearch-config ````) hold `@key = 'value'` lines and become
//!   [`ConnectionOverrides`](crate::config::ConnectionOverrides).
//! - Query blocks (```` ```sql ````, ```` ```ppl ````, ```` ```api ````)
//!   become [`QueryBlock`]s, each paired with the overrides of the nearest
//!   configuration block above it.
//!
//! Parsing is purely textual; nothing here checks that an endpoint is
//! reachable.
//!
//! ~~~text
//! ```config
//! @endpoint = 'https://search.example.com'
//! @auth_type = 'basic'
//! @username = 'admin'
//! @password = 'secret'
//! @timeout = '10s'
//! ```
//!
//! ```api
//! -- @description Create the logs index
//! PUT /logs
//! {"settings": {"number_of_shards": 1}}
//! ```
//! ~~~

mod blocks;
mod document;
mod types;
mod validate;

pub use blocks::{parse_config_body, parse_query_body, parse_timeout};
pub use document::{
    parse_configuration_blocks, parse_document, parse_document_with_overrides,
    CONFIG_BLOCK_LABELS,
};
pub use types::{BlockRange, ConfigurationBlock, ParsedDocument, QueryBlock};
pub use validate::validate_query;

pub use crate::config::validate_connection_overrides;
