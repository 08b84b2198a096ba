//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::output::OutputFormat;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.upload.max_files == 0 {
            return Err(ConfigError::ValidationError(
                "upload.max_files must be > 0".into(),
            ));
        }
        let max_mb = self.upload.max_size_mb;
        if !max_mb.is_finite() || max_mb <= 0.0 {
            return Err(ConfigError::ValidationError(
                "upload.max_size_mb must be a positive number".into(),
            ));
        }
        if self.upload.accepted_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "upload.accepted_formats must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .upload
            .accepted_formats
            .iter()
            .find(|f| f.split('/').next().unwrap_or("").trim().is_empty())
        {
            return Err(ConfigError::ValidationError(format!(
                "upload.accepted_formats contains an invalid MIME type: {bad:?}"
            )));
        }
        if self.review.title_min_len > self.review.title_max_len {
            return Err(ConfigError::ValidationError(
                "review.title_min_len must be <= review.title_max_len".into(),
            ));
        }
        if self.review.title_max_len == 0 {
            return Err(ConfigError::ValidationError(
                "review.title_max_len must be > 0".into(),
            ));
        }
        if self.review.max_tags == 0 {
            return Err(ConfigError::ValidationError(
                "review.max_tags must be > 0".into(),
            ));
        }
        if self.review.categories.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "review.categories must not contain empty names".into(),
            ));
        }
        if OutputFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"json\" or \"jsonl\", got {:?}",
                self.output.format
            )));
        }
        Ok(())
    }
}
