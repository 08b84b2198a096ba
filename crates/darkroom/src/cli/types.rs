//! Shared CLI argument types.

use clap::ValueEnum;
use darkroom_core::OutputFormat as CoreOutputFormat;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Pick the CLI format if given, else the configured default.
pub fn resolve_format(
    cli: Option<OutputFormat>,
    config: &darkroom_core::Config,
) -> CoreOutputFormat {
    cli.map(Into::into)
        .or_else(|| CoreOutputFormat::parse(&config.output.format))
        .unwrap_or(CoreOutputFormat::Json)
}

/// Open the output destination: a file (with `~` expanded) or stdout.
pub fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let path_str = path.to_string_lossy();
            let expanded = PathBuf::from(shellexpand::tilde(&path_str).into_owned());
            Ok(Box::new(BufWriter::new(File::create(expanded)?)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
