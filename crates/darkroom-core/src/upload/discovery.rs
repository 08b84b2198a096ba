//! Candidate file discovery on disk.
//!
//! Expands user-supplied paths into files and reads them into
//! [`PhotoFile`]s. Judging files is the validator's job; [`load`] asks it
//! to screen a batch before anything is read.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ValidationError;
use crate::types::PhotoFile;

use super::sniff::detect_mime;
use super::validate::Validator;

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Expand paths into the files they name.
///
/// A file path yields itself; a directory is walked recursively. Hidden
/// files are skipped inside directories. Results from each directory are
/// sorted by path; the order of the input paths is kept.
pub fn discover(paths: &[PathBuf]) -> Vec<DiscoveredFile> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            if let Ok(meta) = std::fs::metadata(path) {
                files.push(DiscoveredFile {
                    path: path.clone(),
                    size: meta.len(),
                });
            }
            continue;
        }

        let mut found: Vec<DiscoveredFile> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let size = e.metadata().ok()?.len();
                Some(DiscoveredFile {
                    path: e.path().to_path_buf(),
                    size,
                })
            })
            .collect();
        found.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!("Discovered {} files under {:?}", found.len(), path);
        files.extend(found);
    }
    files
}

/// Read a file from disk into a candidate with a detected MIME type.
pub async fn read_photo_file(path: &Path) -> std::io::Result<PhotoFile> {
    let data = tokio::fs::read(path).await?;
    let mime = detect_mime(path, &data[..data.len().min(16)]);
    Ok(PhotoFile::new(PhotoFile::name_from_path(path), mime, data))
}

/// Files read from disk, plus the ones refused on the way.
#[derive(Debug, Default)]
pub struct ReadBatch {
    /// Candidates ready for validation, in input order
    pub files: Vec<PhotoFile>,
    /// Files refused before or while reading
    pub errors: Vec<ValidationError>,
}

/// Read every discovered file. Unreadable files become `Unreadable` errors.
pub async fn read_all(files: &[DiscoveredFile]) -> ReadBatch {
    let mut batch = ReadBatch {
        files: Vec::with_capacity(files.len()),
        errors: Vec::new(),
    };
    for file in files {
        match read_photo_file(&file.path).await {
            Ok(photo) => batch.files.push(photo),
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", file.path, e);
                batch.errors.push(ValidationError::Unreadable {
                    name: PhotoFile::name_from_path(&file.path),
                    reason: e.to_string(),
                });
            }
        }
    }
    batch
}

/// Screen discovered files against the count and size limits, then read
/// the ones that pass.
pub async fn load(validator: &Validator, files: Vec<DiscoveredFile>) -> ReadBatch {
    let screening = validator.screen(files);
    let mut batch = read_all(&screening.readable).await;
    batch.errors.splice(0..0, screening.errors);
    tracing::debug!(
        "Loaded {} file(s), {} refused",
        batch.files.len(),
        batch.errors.len()
    );
    batch
}

/// Get total size of all discovered files.
pub fn total_size(files: &[DiscoveredFile]) -> u64 {
    files.iter().map(|f| f.size).sum()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}
