//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Run SQL, PPL and REST query blocks embedded in Markdown documents
#[derive(Parser, Debug)]
#[command(name = "docquery")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connection configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Cluster endpoint URL
    #[arg(long, global = true, env = "DOCQUERY_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Authentication type (none, basic, apikey)
    #[arg(long, global = true, env = "DOCQUERY_AUTH_TYPE")]
    pub auth_type: Option<String>,

    /// Username for basic authentication
    #[arg(long, global = true, env = "DOCQUERY_USERNAME")]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long, global = true, env = "DOCQUERY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// API key for apikey authentication
    #[arg(long, global = true, env = "DOCQUERY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout (milliseconds, or with an `s`/`ms` suffix)
    #[arg(long, global = true, env = "DOCQUERY_TIMEOUT")]
    pub timeout: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show configuration and query blocks found in a document
    Parse {
        /// Markdown document
        file: PathBuf,
    },

    /// Validate every query block without sending anything
    Validate {
        /// Markdown document
        file: PathBuf,
    },

    /// Execute query blocks
    Run {
        /// Markdown document
        file: PathBuf,

        /// Only run this block (0-based)
        #[arg(long)]
        block: Option<usize>,
    },

    /// Explain SQL and PPL query blocks
    Explain {
        /// Markdown document
        file: PathBuf,

        /// Only explain this block (0-based)
        #[arg(long)]
        block: Option<usize>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}
