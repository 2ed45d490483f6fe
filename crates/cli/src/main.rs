//! ArchiMind CLI
//!
//! Main entry point for the archimind command-line tool: indexing, retrieval,
//! code generation and review, and repository documentation.

mod commands;

use archimind_core::{config::AppConfig, logging, AppResult};
use clap::{Parser, Subcommand};
use commands::{
    AnalyzeCommand, AskCommand, CollectionsCommand, GenerateCommand, IndexCommand,
    PromptsCommand, QueryCommand, ReviewCommand, StatusCommand,
};
use std::path::PathBuf;

/// ArchiMind - retrieval-augmented code assistant
#[derive(Parser, Debug)]
#[command(name = "archimind")]
#[command(about = "Retrieval-augmented code generation, review and documentation", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "ARCHIMIND_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "ARCHIMIND_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// LLM provider (ollama, gemini)
    #[arg(short, long, global = true, env = "ARCHIMIND_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "ARCHIMIND_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index a directory into a collection
    Index(IndexCommand),

    /// Print the context retrieved from a collection
    Query(QueryCommand),

    /// Generate code informed by the practices collection
    Generate(GenerateCommand),

    /// Review a file against the bad practices collection
    Review(ReviewCommand),

    /// Ask a question about an indexed collection
    Ask(AskCommand),

    /// Clone, index and document a repository
    Analyze(AnalyzeCommand),

    /// Show the last analysis status
    Status(StatusCommand),

    /// List collections in the vector store
    Collections(CollectionsCommand),

    /// List available prompts
    Prompts(PromptsCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Index(_) => "index",
            Commands::Query(_) => "query",
            Commands::Generate(_) => "generate",
            Commands::Review(_) => "review",
            Commands::Ask(_) => "ask",
            Commands::Analyze(_) => "analyze",
            Commands::Status(_) => "status",
            Commands::Collections(_) => "collections",
            Commands::Prompts(_) => "prompts",
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.workspace, cli.config)?.with_overrides(
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("ArchiMind CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.llm.provider);
    tracing::debug!("Model: {}", config.llm.model);

    config.validate()?;
    config.ensure_state_dir()?;

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match cli.command {
        Commands::Index(cmd) => cmd.execute(&config).await,
        Commands::Query(cmd) => cmd.execute(&config).await,
        Commands::Generate(cmd) => cmd.execute(&config).await,
        Commands::Review(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Analyze(cmd) => cmd.execute(&config).await,
        Commands::Status(cmd) => cmd.execute(&config),
        Commands::Collections(cmd) => cmd.execute(&config),
        Commands::Prompts(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
