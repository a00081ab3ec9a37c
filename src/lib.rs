//! # docquery
//!
//! Run SQL, PPL and raw REST query blocks embedded in Markdown documents
//! against an OpenSearch cluster.
//!
//! ## Features
//!
//! - **Document Parsing**: fenced `sql`, `ppl` and `api` blocks, with
//!   `config` blocks overriding the connection for the blocks that follow
//! - **Pre-flight Validation**: ordered rule sets that fail before anything is
//!   sent
//! - **Bulk Support**: NDJSON framing for `_bulk` and `_msearch` bodies
//! - **Uniform Results**: every execution, successful or not, produces a
//!   [`QueryResult`] with the request and response attached
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docquery::{parse_document_with_overrides, ConnectionConfig, QueryExecutor, ReqwestTransport};
//!
//! #[tokio::main]
//! async fn main() -> docquery::Result<()> {
//!     let doc = std::fs::read_to_string("queries.md")?;
//!     let blocks = parse_document_with_overrides(&doc);
//!
//!     let config = ConnectionConfig::from_file("connection.yaml")?;
//!     let executor = QueryExecutor::new(ReqwestTransport::new()?);
//!
//!     for result in executor.execute_all(&config, &blocks).await {
//!         println!("{}", serde_json::to_string(&result)?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Markdown document                     │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ parser
//!                    QueryBlock + ConnectionOverrides
//!                                │
//! ┌──────────┬───────────────────┴──┬──────────────┬─────────────┐
//! │ validate │  request (auth,      │  transport   │  normalize  │
//! │ (rules)  │  bulk framing)       │  (reqwest)   │  (errors)   │
//! └──────────┴──────────────────────┴──────────────┴─────────────┘
//!                                │ engine
//!                           QueryResult
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// JSON and NDJSON helpers
pub mod json;

/// Base connection configuration and override layers
pub mod config;

/// Markdown document parsing
pub mod parser;

/// Pre-flight validation rules
pub mod validation;

/// Request construction and response capture
pub mod request;

/// HTTP transport
pub mod transport;

/// Error classification
pub mod normalize;

/// Query execution
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{AuthDescriptor, AuthType, ConnectionConfig, ConnectionOverrides};
pub use engine::{ConnectionInfo, QueryExecutor, QueryResult};
pub use parser::{parse_configuration_blocks, parse_document_with_overrides, QueryBlock};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use validation::ValidationPipeline;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
