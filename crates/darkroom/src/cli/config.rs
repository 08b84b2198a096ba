//! The `darkroom config` command: inspect and create the settings that
//! drive intake limits and review rules.

use clap::{Args, Subcommand};
use darkroom_core::Config;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file location
    Path,

    /// Validate the config file and summarize the limits it sets
    Check,

    /// Write a config file with the default limits and rules
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let path = args.file.unwrap_or_else(Config::default_path);

    match args.command {
        ConfigCommand::Show => println!("{}", load(&path)?.to_toml()?),
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Check => {
            let config = load(&path)?;
            print!("{}", describe(&config));
            tracing::info!("Config at {} is valid", path.display());
        }
        ConfigCommand::Init { force } => {
            write_default_config(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Load `path`, or the defaults when it does not exist yet.
fn load(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    Ok(Config::load_from(path)?)
}

/// Human-readable summary of what a config allows.
fn describe(config: &Config) -> String {
    let upload = &config.upload;
    let review = &config.review;
    let categories = if review.categories.is_empty() {
        "any".to_string()
    } else {
        review.categories.join(", ")
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Intake:  up to {} files per batch, {}MB each ({})",
        upload.max_files,
        upload.max_size_mb,
        upload.accepted_formats.join(", ")
    );
    let _ = writeln!(
        out,
        "Review:  title {}-{} chars, description up to {} chars, up to {} tags",
        review.title_min_len, review.title_max_len, review.description_max_len, review.max_tags
    );
    let _ = writeln!(out, "Categories: {categories}");
    out
}

/// Write the default configuration to `path`, creating parent directories.
fn write_default_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}
