//! Darkroom CLI - stage, review and confirm photos before upload.
//!
//! Each invocation runs one in-memory session: files are validated, staged
//! with previews, edited in bulk, optionally confirmed, and summarized as
//! JSON. Nothing is persisted between runs.
//!
//! # Usage
//!
//! ```bash
//! # Check which files would be accepted
//! darkroom validate ./shoot/
//!
//! # Stage a folder, tag and categorize it, confirm what is complete
//! darkroom stage ./shoot/ --title "Coastline" --category landscape --tag sea --confirm
//!
//! # View configuration
//! darkroom config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Darkroom - stage, review and confirm photos before upload.
#[derive(Parser, Debug)]
#[command(name = "darkroom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate candidate files without staging them
    Validate(cli::validate::ValidateArgs),

    /// Stage files, apply metadata edits and optionally confirm them
    Stage(cli::stage::StageArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go to stderr directly.
    let config = match darkroom_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `darkroom config check`."
            );
            darkroom_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Darkroom v{}", darkroom_core::VERSION);

    match cli.command {
        Commands::Validate(args) => cli::validate::execute(args, config).await,
        Commands::Stage(args) => cli::stage::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
