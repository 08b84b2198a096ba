//! Upload intake: everything that happens before a file becomes a record.
//!
//! - **validate**: the validation engine (format, size, duplicates, batch size)
//! - **sniff**: MIME detection for files read from disk
//! - **discovery**: expand paths into candidate files and load them

pub mod discovery;
pub mod sniff;
pub mod validate;

pub use discovery::{
    discover, load, read_all, read_photo_file, total_size, DiscoveredFile, ReadBatch,
};
pub use sniff::detect_mime;
pub use validate::{BatchValidation, Screening, Validator};
