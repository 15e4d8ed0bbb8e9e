//! docqa CLI
//!
//! Main entry point for the docqa command-line tool.
//! Answers questions about documents with cited sources.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, IngestCommand};
use docqa_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;
use tracing::Instrument;

/// docqa - question answering over your documents
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(about = "Question answering over documents with cited sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "DOCQA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "DOCQA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (ollama, openai)
    #[arg(short, long, global = true, env = "DOCQA_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "DOCQA_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question from documents
    Ask(AskCommand),

    /// Split documents into chunks and report the result
    Ingest(IngestCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Ask(_) => "ask",
            Commands::Ingest(_) => "ingest",
        }
    }
}

/// Run one subcommand inside its `command` span.
async fn run_command(command: Commands, config: &AppConfig) -> AppResult<()> {
    let span = tracing::info_span!("command", name = command.name());

    async move {
        match command {
            Commands::Ask(cmd) => cmd.execute(config).await,
            Commands::Ingest(cmd) => cmd.execute(config).await,
        }
    }
    .instrument(span)
    .await
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;

    // An explicit config file is merged before CLI flags apply
    if let Some(ref path) = cli.config {
        config = config.merge_yaml(path)?;
    }

    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("docqa starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let result = run_command(cli.command, &config).await;

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
