//! Candidate file validation before staging.

use crate::config::UploadConfig;
use crate::error::ValidationError;
use crate::types::PhotoFile;

use super::discovery::DiscoveredFile;

/// Outcome of validating one batch of candidate files.
#[derive(Debug, Default)]
pub struct BatchValidation {
    /// Accepted files, in input order
    pub valid: Vec<PhotoFile>,
    /// One entry per rejected file, or a single `TooMany` for the batch
    pub errors: Vec<ValidationError>,
}

/// Discovered files split by the limits that need no file contents.
#[derive(Debug, Default)]
pub struct Screening {
    /// Files still worth reading, in input order
    pub readable: Vec<DiscoveredFile>,
    /// Files refused on size, or a single `TooMany` for the batch
    pub errors: Vec<ValidationError>,
}

/// Decides whether candidate files may be staged. Holds no state besides
/// its limits.
#[derive(Debug, Clone)]
pub struct Validator {
    limits: UploadConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: UploadConfig) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &UploadConfig {
        &self.limits
    }

    /// Judge a single file against the limits and the files already
    /// accepted in the same batch.
    ///
    /// Checks, in order:
    /// - MIME top-level type is accepted
    /// - Size is within the limit
    /// - No accepted file has the same name and size
    pub fn validate(&self, file: &PhotoFile, accepted: &[PhotoFile]) -> Result<(), ValidationError> {
        if !self.is_accepted_type(&file.mime_type) {
            return Err(ValidationError::InvalidFormat {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            });
        }

        self.check_size(&file.name, file.size())?;

        // Name + size is a weak identity, but it is the only one available
        // before the payload is read.
        if accepted
            .iter()
            .any(|f| f.name == file.name && f.size() == file.size())
        {
            return Err(ValidationError::Duplicate {
                name: file.name.clone(),
            });
        }

        Ok(())
    }

    /// Partition a batch into accepted files and per-file errors.
    ///
    /// A batch larger than `max_files` is refused as a whole. Otherwise
    /// every file is judged independently.
    pub fn validate_batch(&self, files: Vec<PhotoFile>) -> BatchValidation {
        if let Some(err) = self.check_count(files.len()) {
            return BatchValidation {
                valid: Vec::new(),
                errors: vec![err],
            };
        }

        let mut result = BatchValidation::default();
        for file in files {
            match self.validate(&file, &result.valid) {
                Ok(()) => result.valid.push(file),
                Err(e) => {
                    tracing::debug!("Rejected {}: {}", file.name, e);
                    result.errors.push(e);
                }
            }
        }

        tracing::debug!(
            "Validated batch: {} accepted, {} rejected",
            result.valid.len(),
            result.errors.len()
        );
        result
    }

    /// Apply the batch count and size limits to files not yet read.
    ///
    /// Only discovery metadata is used, so files that would be refused on
    /// size (or a batch refused on count) are never loaded. Format and
    /// duplicate checks need the payload and happen in
    /// [`validate_batch`](Self::validate_batch).
    pub fn screen(&self, files: Vec<DiscoveredFile>) -> Screening {
        if let Some(err) = self.check_count(files.len()) {
            return Screening {
                readable: Vec::new(),
                errors: vec![err],
            };
        }

        let mut result = Screening::default();
        for file in files {
            let name = PhotoFile::name_from_path(&file.path);
            match self.check_size(&name, file.size) {
                Ok(()) => result.readable.push(file),
                Err(e) => {
                    tracing::debug!("Rejected {} before reading: {}", name, e);
                    result.errors.push(e);
                }
            }
        }
        result
    }

    fn check_count(&self, count: usize) -> Option<ValidationError> {
        if count <= self.limits.max_files {
            return None;
        }
        tracing::warn!(
            "Rejected batch of {} files (max {})",
            count,
            self.limits.max_files
        );
        Some(ValidationError::TooMany {
            count,
            max: self.limits.max_files,
        })
    }

    fn check_size(&self, name: &str, size: u64) -> Result<(), ValidationError> {
        if size > self.limits.max_size_bytes() {
            return Err(ValidationError::TooLarge {
                name: name.to_string(),
                size_bytes: size,
                max_mb: self.limits.max_size_mb,
            });
        }
        Ok(())
    }

    /// Check the MIME type's top-level category against the accepted set.
    fn is_accepted_type(&self, mime_type: &str) -> bool {
        let Some(top) = top_level(mime_type) else {
            return false;
        };
        self.limits
            .accepted_formats
            .iter()
            .filter_map(|format| top_level(format))
            .any(|accepted| accepted.eq_ignore_ascii_case(top))
    }
}

/// Top-level type of a MIME string ("image" for "image/png").
fn top_level(mime_type: &str) -> Option<&str> {
    let top = mime_type.split('/').next()?.trim();
    (!top.is_empty()).then_some(top)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: usize = 1024 * 1024;

    fn file(name: &str, mime: &str, size: usize) -> PhotoFile {
        PhotoFile::new(name, mime, vec![0u8; size])
    }

    fn validator() -> Validator {
        Validator::new(UploadConfig::default())
    }

    #[test]
    fn test_accepts_image() {
        let v = validator();
        assert!(v.validate(&file("a.jpg", "image/jpeg", 10), &[]).is_ok());
    }

    #[test]
    fn test_top_level_match_accepts_other_image_subtypes() {
        let v = validator();
        assert!(v.validate(&file("a.tif", "image/tiff", 10), &[]).is_ok());
        assert!(v.validate(&file("a.PNG", "IMAGE/PNG", 10), &[]).is_ok());
    }

    #[test]
    fn test_rejects_non_image() {
        let v = validator();
        let err = v
            .validate(&file("notes.pdf", "application/pdf", 10), &[])
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
        assert_eq!(err.to_string(), "notes.pdf is not a valid image format");

        let err = v.validate(&file("blank", "", 10), &[]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let v = validator();
        assert!(v.validate(&file("edge.jpg", "image/jpeg", 10 * MB), &[]).is_ok());
        let err = v
            .validate(&file("big.jpg", "image/jpeg", 10 * MB + 1), &[])
            .unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
    }

    #[test]
    fn test_duplicate_needs_same_name_and_size() {
        let v = validator();
        let accepted = vec![file("a.jpg", "image/jpeg", 10)];
        let err = v
            .validate(&file("a.jpg", "image/jpeg", 10), &accepted)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Duplicate {
                name: "a.jpg".to_string()
            }
        );
        assert!(v.validate(&file("a.jpg", "image/jpeg", 11), &accepted).is_ok());
        assert!(v.validate(&file("b.jpg", "image/jpeg", 10), &accepted).is_ok());
    }

    #[test]
    fn test_batch_judges_each_file() {
        let v = validator();
        let result = v.validate_batch(vec![
            file("a.jpg", "image/jpeg", 10),
            file("b.txt", "text/plain", 10),
            file("a.jpg", "image/jpeg", 10),
            file("c.png", "image/png", 20),
        ]);
        let names: Vec<&str> = result.valid.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "c.png"]);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(result.errors[0], ValidationError::InvalidFormat { .. }));
        assert!(matches!(result.errors[1], ValidationError::Duplicate { .. }));
    }

    #[test]
    fn test_batch_too_many() {
        let limits = UploadConfig {
            max_files: 2,
            ..UploadConfig::default()
        };
        let v = Validator::new(limits);
        let result = v.validate_batch(vec![
            file("a.jpg", "image/jpeg", 1),
            file("b.jpg", "image/jpeg", 1),
            file("c.jpg", "image/jpeg", 1),
        ]);
        assert!(result.valid.is_empty());
        assert_eq!(
            result.errors,
            vec![ValidationError::TooMany { count: 3, max: 2 }]
        );
    }

    fn discovered(name: &str, size: u64) -> DiscoveredFile {
        DiscoveredFile {
            path: std::path::PathBuf::from("shoot").join(name),
            size,
        }
    }

    #[test]
    fn test_screen_refuses_oversized_files_by_metadata() {
        let v = validator();
        let result = v.screen(vec![
            discovered("small.jpg", 100),
            discovered("huge.jpg", 40 * MB as u64),
            discovered("edge.jpg", 10 * MB as u64),
        ]);
        let names: Vec<String> = result
            .readable
            .iter()
            .map(|f| PhotoFile::name_from_path(&f.path))
            .collect();
        assert_eq!(names, vec!["small.jpg", "edge.jpg"]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].to_string(), "huge.jpg exceeds 10MB size limit");
    }

    #[test]
    fn test_screen_refuses_whole_batch_over_count() {
        let limits = UploadConfig {
            max_files: 2,
            ..UploadConfig::default()
        };
        let v = Validator::new(limits);
        let result = v.screen(vec![
            discovered("a.jpg", 1),
            discovered("b.jpg", 1),
            discovered("c.jpg", 1),
        ]);
        assert!(result.readable.is_empty());
        assert_eq!(
            result.errors,
            vec![ValidationError::TooMany { count: 3, max: 2 }]
        );
    }

    #[test]
    fn test_batch_at_limit_is_allowed() {
        let limits = UploadConfig {
            max_files: 2,
            ..UploadConfig::default()
        };
        let v = Validator::new(limits);
        let result = v.validate_batch(vec![
            file("a.jpg", "image/jpeg", 1),
            file("b.jpg", "image/jpeg", 1),
        ]);
        assert_eq!(result.valid.len(), 2);
        assert!(result.errors.is_empty());
    }
}
