//! Darkroom Core - staging, review and confirmation of photo uploads.
//!
//! Locally selected photos pass through a one-way pipeline before they are
//! handed to an upload backend:
//!
//! ```text
//! Files → Validate → Stage (preview + record) → Review (edit, select, bulk) → Confirm
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use darkroom_core::{BulkEdit, Config, PhotoFile, PhotoStore, PreviewRegistry, ReviewController};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load().unwrap_or_default();
//!     let mut store = PhotoStore::new(&config, Arc::new(PreviewRegistry::new()));
//!     let mut review = ReviewController::new(config.review.clone());
//!
//!     let bytes = std::fs::read("dunes.jpg").unwrap();
//!     store.stage(vec![PhotoFile::new("dunes.jpg", "image/jpeg", bytes)]).await;
//!
//!     review.select_all(&store);
//!     review.bulk_apply(&mut store, BulkEdit::Category("landscape".into()));
//!     store.confirm_all();
//! }
//! ```

pub mod config;
pub mod error;
pub mod notify;
pub mod output;
pub mod preview;
pub mod review;
pub mod store;
pub mod types;
pub mod upload;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, DarkroomError, PatchError, Result, StoreError, StoreResult, ValidationError,
};
pub use notify::{Notifier, NotifyKind, TracingNotifier};
pub use output::{OutputFormat, OutputWriter};
pub use preview::{PreviewFactory, PreviewHandle, PreviewRegistry};
pub use review::{BulkEdit, BulkReport, FieldRules, ReviewController};
pub use store::{PhotoStore, StageOutcome};
pub use types::{PhotoFile, PhotoId, PhotoPatch, PhotoStatus, PhotoSummary, StagedPhoto};
pub use upload::Validator;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[tokio::test]
    async fn test_wizard_flow() {
        let config = Config::default();
        let registry = PreviewRegistry::new();
        let mut store = PhotoStore::new(&config, Arc::new(registry.clone()));
        let mut review = ReviewController::new(config.review.clone());

        let outcome = store
            .stage(vec![
                PhotoFile::new("dunes.jpg", "image/jpeg", vec![0u8; 64]),
                PhotoFile::new("notes.txt", "text/plain", vec![0u8; 8]),
                PhotoFile::new("bride.png", "image/png", vec![0u8; 32]),
            ])
            .await;
        assert_eq!(outcome.created.len(), 2);
        assert!(outcome.has_errors());

        review.select_all(&store);
        let report = review.bulk_apply(&mut store, BulkEdit::Title("Summer 2024".into()));
        assert!(report.is_clean());
        review.bulk_apply(&mut store, BulkEdit::Category("event".into()));

        let ids = review.confirm_complete(&mut store);
        assert_eq!(ids.len(), 2);
        assert!(store.staged().is_empty());
        assert_eq!(store.confirmed().len(), 2);
        assert!(review.selected(&store).is_empty());

        // Confirmed work survives a clear.
        assert_eq!(store.clear(), 0);
        assert_eq!(registry.live_count(), 2);
    }
}
