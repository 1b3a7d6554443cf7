//! Docmatch CLI
//!
//! Main entry point for the docmatch command-line tool.
//! Routes questions to documentation pages by keyword overlap and manages
//! suggested edits to those pages.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, DocsCommand, FeedbackCommand, SuggestionsCommand};
use docmatch_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Docmatch - keyword-routed answers from your documentation
#[derive(Parser, Debug)]
#[command(name = "docmatch")]
#[command(about = "Keyword-routed answers from your documentation", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "DOCMATCH_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "DOCMATCH_CONFIG")]
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

    /// LLM provider (ollama)
    #[arg(short, long, global = true, env = "DOCMATCH_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "DOCMATCH_MODEL")]
    model: Option<String>,

    /// Directory holding the markdown documents
    #[arg(long, global = true, env = "DOCMATCH_DOCS_DIR")]
    docs_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find the document that answers a question, then answer it
    Ask(AskCommand),

    /// Manage documents and their keyword sets
    Docs(DocsCommand),

    /// Propose an edit to a document that answered poorly
    Feedback(FeedbackCommand),

    /// Review proposed edits
    Suggestions(SuggestionsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load configuration for the selected workspace
    let config = AppConfig::load_with(cli.workspace.clone(), cli.config.clone())?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.docs_dir,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Docmatch CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Documents: {:?}", config.docs_dir());
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    config.validate()?;

    // Ensure .docmatch and the document directory exist
    config.ensure_dirs()?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Docs(_) => "docs",
        Commands::Feedback(_) => "feedback",
        Commands::Suggestions(_) => "suggestions",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Docs(cmd) => cmd.execute(&config).await,
        Commands::Feedback(cmd) => cmd.execute(&config).await,
        Commands::Suggestions(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
