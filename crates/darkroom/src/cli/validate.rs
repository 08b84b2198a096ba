//! The `darkroom validate` command: judge files without staging them.

use clap::Args;
use darkroom_core::upload::{discover, load, total_size, DiscoveredFile};
use darkroom_core::{Config, ValidationError, Validator};
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Image files or directories to check
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Override the maximum number of files per batch
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Override the maximum file size in megabytes
    #[arg(long)]
    pub max_size_mb: Option<f64>,
}

/// A file that would be staged.
#[derive(Debug, Serialize)]
struct AcceptedFile {
    name: String,
    mime_type: String,
    size: u64,
}

/// A file (or batch) that would be refused.
#[derive(Debug, Serialize)]
struct RejectedFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    reason: String,
}

/// JSON report printed by the command.
#[derive(Debug, Serialize)]
struct ValidationReport {
    accepted: Vec<AcceptedFile>,
    rejected: Vec<RejectedFile>,
}

impl From<&ValidationError> for RejectedFile {
    fn from(err: &ValidationError) -> Self {
        Self {
            name: err.file_name().map(str::to_string),
            reason: err.to_string(),
        }
    }
}

/// Execute the validate command.
pub async fn execute(args: ValidateArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(max_files) = args.max_files {
        config.upload.max_files = max_files;
    }
    if let Some(max_size_mb) = args.max_size_mb {
        config.upload.max_size_mb = max_size_mb;
    }

    let discovered = discover(&args.inputs);
    if discovered.is_empty() {
        anyhow::bail!(
            "No files found at {:?}\n\n  Hint: Check the paths and try again.",
            args.inputs
        );
    }
    tracing::info!(
        "Checking {} file(s) ({} bytes)",
        discovered.len(),
        total_size(&discovered)
    );

    let report = build_report(&Validator::new(config.upload), discovered).await;

    tracing::info!(
        "{} accepted, {} rejected",
        report.accepted.len(),
        report.rejected.len()
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Load and judge a batch. Files refused before reading come first.
async fn build_report(validator: &Validator, discovered: Vec<DiscoveredFile>) -> ValidationReport {
    let loaded = load(validator, discovered).await;
    let batch = validator.validate_batch(loaded.files);

    ValidationReport {
        accepted: batch
            .valid
            .iter()
            .map(|f| AcceptedFile {
                name: f.name.clone(),
                mime_type: f.mime_type.clone(),
                size: f.size(),
            })
            .collect(),
        rejected: loaded
            .errors
            .iter()
            .chain(&batch.errors)
            .map(RejectedFile::from)
            .collect(),
    }
}
