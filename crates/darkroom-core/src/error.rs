//! Error types for the staged upload pipeline.
//!
//! Errors are grouped by the component that reports them: file validation,
//! store mutations, metadata patches, and configuration. Every expected
//! condition is a typed, recoverable value; nothing here is fatal.

use thiserror::Error;

use crate::types::PhotoId;

/// Top-level error type for Darkroom operations.
#[derive(Error, Debug)]
pub enum DarkroomError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Store mutation errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Reasons a candidate file is refused before staging.
///
/// The display strings are the user-facing messages shown by the
/// notification sink.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// MIME type is not one of the accepted top-level types
    #[error("{name} is not a valid image format")]
    InvalidFormat { name: String, mime_type: String },

    /// File exceeds the configured size limit
    #[error("{name} exceeds {max_mb}MB size limit")]
    TooLarge {
        name: String,
        size_bytes: u64,
        max_mb: f64,
    },

    /// Same name and size as a file already accepted in this batch
    #[error("{name} is a duplicate")]
    Duplicate { name: String },

    /// Batch holds more files than allowed
    #[error("Maximum {max} files allowed. You selected {count} files.")]
    TooMany { count: usize, max: usize },

    /// The file could not be read from disk
    #[error("{name} could not be read: {reason}")]
    Unreadable { name: String, reason: String },
}

impl ValidationError {
    /// Name of the rejected file, if the error concerns a single file.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::InvalidFormat { name, .. }
            | Self::TooLarge { name, .. }
            | Self::Duplicate { name }
            | Self::Unreadable { name, .. } => Some(name),
            Self::TooMany { .. } => None,
        }
    }
}

/// Errors reported by store and controller mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No record with this id exists
    #[error("Photo not found: {0}")]
    NotFound(PhotoId),

    /// The record is confirmed and no longer editable
    #[error("Photo already confirmed: {0}")]
    NotStaged(PhotoId),

    /// The patch violates a field or tag constraint
    #[error("Invalid patch: {0}")]
    InvalidPatch(#[from] PatchError),
}

/// Field and tag constraint violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("Title must be at least {min} characters")]
    TitleTooShort { min: usize },

    #[error("Title must be at most {max} characters")]
    TitleTooLong { max: usize },

    #[error("Description must be at most {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("Category is required")]
    CategoryRequired,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Tags cannot be empty")]
    EmptyTag,

    #[error("Duplicate tag: {0}")]
    DuplicateTag(String),

    #[error("Too many tags ({count} > {max})")]
    TooManyTags { count: usize, max: usize },
}

/// Convenience type alias for Darkroom results.
pub type Result<T> = std::result::Result<T, DarkroomError>;

/// Convenience type alias for store mutation results.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
