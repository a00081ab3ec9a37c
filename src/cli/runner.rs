//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ConnectionConfig;
use crate::engine::{QueryExecutor, QueryResult};
use crate::error::{Error, Result, ResultExt};
use crate::parser::{parse_document, parse_timeout, QueryBlock};
use crate::transport::ReqwestTransport;
use crate::types::QueryType;
use crate::validation::{validate_query_content, ValidationContext, ValidationPipeline};
use futures::future::join_all;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Parse { file } => self.parse(file),
            Commands::Validate { file } => self.validate(file),
            Commands::Run { file, block } => self.execute(file, *block, false).await,
            Commands::Explain { file, block } => self.execute(file, *block, true).await,
        }
    }

    /// Resolve the base connection config
    ///
    /// Starts from the config file (or defaults), then applies flags and
    /// environment variables field by field.
    pub fn connection_config(&self) -> Result<ConnectionConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ConnectionConfig::from_file(path)?,
            None => ConnectionConfig::default(),
        };

        if let Some(endpoint) = &self.cli.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(auth_type) = &self.cli.auth_type {
            config.auth.auth_type = auth_type.parse()?;
        }
        if let Some(username) = &self.cli.username {
            config.auth.username = Some(username.clone());
        }
        if let Some(password) = &self.cli.password {
            config.auth.password = Some(password.clone());
        }
        if let Some(api_key) = &self.cli.api_key {
            config.auth.api_key = Some(api_key.clone());
        }
        if let Some(timeout) = &self.cli.timeout {
            config.timeout = parse_timeout(timeout).ok_or_else(|| {
                Error::invalid_value("timeout", format!("'{timeout}' is not a valid duration"))
            })?;
        }

        config.validate()?;
        debug!("Using endpoint {}", config.endpoint);
        Ok(config)
    }

    /// Read a document from disk
    fn read_document(path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
    }

    /// Show parsed blocks
    fn parse(&self, file: &Path) -> Result<()> {
        let parsed = parse_document(&Self::read_document(file)?);
        self.output_message(&serde_json::to_value(&parsed)?);
        Ok(())
    }

    /// Validate every query block
    fn validate(&self, file: &Path) -> Result<()> {
        let parsed = parse_document(&Self::read_document(file)?);
        let pipeline = ValidationPipeline::new();
        let mut failed = 0;

        for (index, block) in parsed.query_blocks.iter().enumerate() {
            let ctx = ValidationContext::for_block(block, Instant::now());
            let verdict = match pipeline.validate_query(&ctx) {
                Ok(()) => validate_query_content(&block.body, block.query_type()).into_result(),
                Err(failure) => Err(failure.error),
            };

            if verdict.is_err() {
                failed += 1;
            }
            self.output_message(&json!({
                "block": index,
                "type": block.query_type(),
                "valid": verdict.is_ok(),
                "error": verdict.err(),
            }));
        }

        let total = parsed.query_blocks.len();
        info!("Validated {total} query blocks, {failed} failed");
        if failed > 0 {
            return Err(Error::Other(format!(
                "{failed} of {total} query blocks failed validation"
            )));
        }
        Ok(())
    }

    /// Run or explain query blocks
    async fn execute(&self, file: &Path, only: Option<usize>, explain: bool) -> Result<()> {
        let config = self.connection_config()?;
        let parsed = parse_document(&Self::read_document(file)?);
        let selected = select_blocks(parsed.query_blocks, only, explain)?;

        let executor = QueryExecutor::new(ReqwestTransport::new()?);
        let blocks: Vec<QueryBlock> = selected.iter().map(|(_, block)| block.clone()).collect();

        info!(
            "{} {} query blocks against {}",
            if explain { "Explaining" } else { "Running" },
            blocks.len(),
            config.endpoint
        );

        let results: Vec<QueryResult> = if explain {
            join_all(blocks.iter().map(|block| executor.explain(&config, block))).await
        } else {
            executor.execute_all(&config, &blocks).await
        };

        let mut failed = 0;
        for ((index, block), result) in selected.iter().zip(&results) {
            if !result.success {
                failed += 1;
            }
            debug!(
                block = index,
                status = ?result.status(),
                elapsed_ms = result.execution_time,
                "block finished"
            );
            self.output_result(*index, block, result)?;
        }

        if failed > 0 {
            return Err(Error::Other(format!(
                "{failed} of {} query blocks failed",
                results.len()
            )));
        }
        Ok(())
    }

    /// Output a result for one block
    fn output_result(&self, index: usize, block: &QueryBlock, result: &QueryResult) -> Result<()> {
        let mut msg = json!({
            "block": index,
            "type": block.query_type(),
            "result": serde_json::to_value(result)?,
        });
        if let Some(description) = &block.description {
            msg["description"] = Value::String(description.clone());
        }
        self.output_message(&msg);
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Pick the blocks a command applies to, keeping their document index
///
/// Explain without `--block` only considers SQL and PPL blocks.
fn select_blocks(
    blocks: Vec<QueryBlock>,
    only: Option<usize>,
    explain: bool,
) -> Result<Vec<(usize, QueryBlock)>> {
    if let Some(index) = only {
        let total = blocks.len();
        return blocks
            .into_iter()
            .enumerate()
            .nth(index)
            .map(|selected| vec![selected])
            .ok_or_else(|| {
                Error::invalid_value(
                    "block",
                    format!("block {index} does not exist (document has {total} query blocks)"),
                )
            });
    }

    Ok(blocks
        .into_iter()
        .enumerate()
        .filter(|(_, block)| !explain || block.query_type() != QueryType::Api)
        .collect())
}
