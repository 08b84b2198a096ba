//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Limits applied to candidate files before they are staged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum number of files accepted in one batch
    pub max_files: usize,

    /// Maximum file size in megabytes
    pub max_size_mb: f64,

    /// Accepted MIME types. Only the top-level type (`image` in
    /// `image/jpeg`) is compared.
    pub accepted_formats: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_files: 50,
            max_size_mb: 10.0,
            accepted_formats: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

impl UploadConfig {
    /// Size limit in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        (self.max_size_mb * 1024.0 * 1024.0) as u64
    }
}

/// Metadata rules enforced while reviewing staged photos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Minimum title length in characters
    pub title_min_len: usize,

    /// Maximum title length in characters
    pub title_max_len: usize,

    /// Maximum description length in characters
    pub description_max_len: usize,

    /// Maximum number of tags per photo
    pub max_tags: usize,

    /// Allowed categories. Empty means any non-empty category.
    pub categories: Vec<String>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            title_min_len: 3,
            title_max_len: 100,
            description_max_len: 500,
            max_tags: 10,
            categories: vec![
                "landscape".to_string(),
                "portrait".to_string(),
                "wedding".to_string(),
                "event".to_string(),
            ],
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
