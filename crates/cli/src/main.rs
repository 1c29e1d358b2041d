//! FAQ bot CLI
//!
//! Main entry point for the faqbot command-line tool.
//! Answers questions about the school from its indexed web pages.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ClassifyCommand, RewriteCommand, SearchCommand};
use faqbot_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// FAQ bot CLI - retrieval-augmented answers about the school
#[derive(Parser, Debug)]
#[command(name = "faqbot")]
#[command(about = "Retrieval-augmented answers about the school", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "FAQBOT_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "FAQBOT_CONFIG")]
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

    /// LLM provider (databricks, ollama)
    #[arg(short, long, global = true, env = "FAQBOT_PROVIDER")]
    provider: Option<String>,

    /// Model identifier or serving endpoint name
    #[arg(short, long, global = true, env = "FAQBOT_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question through the full pipeline
    Ask(AskCommand),

    /// Search the vector index without answering
    Search(SearchCommand),

    /// Classify a question as general or specific
    Classify(ClassifyCommand),

    /// Show the search variants generated for a question
    Rewrite(RewriteCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let mut config = AppConfig::load()?;

    // A config path given only on the command line has not been read yet
    if let Some(path) = &cli.config {
        if config.config_file.as_ref() != Some(path) {
            config = config.merge_yaml(path)?;
        }
    }

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_format)?;

    tracing::info!("FAQ bot CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Search(_) => "search",
        Commands::Classify(_) => "classify",
        Commands::Rewrite(_) => "rewrite",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
        Commands::Classify(cmd) => cmd.execute(&config).await,
        Commands::Rewrite(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
