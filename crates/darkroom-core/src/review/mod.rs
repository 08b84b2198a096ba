//! Review step: selection, bulk edits and metadata rules.

pub mod controller;
pub mod rules;

pub use controller::{BulkEdit, BulkFailure, BulkReport, ReviewController};
pub use rules::FieldRules;
