//! CLI module
//!
//! Command-line interface for running query documents.
//!
//! # Commands
//!
//! - `parse` - Show configuration and query blocks
//! - `validate` - Check every query block without sending anything
//! - `run` - Execute query blocks
//! - `explain` - Explain SQL and PPL query blocks

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
