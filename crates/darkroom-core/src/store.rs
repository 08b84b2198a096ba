//! The staged photo store.
//!
//! [`PhotoStore`] is the sole owner of staged and confirmed records. Every
//! mutation takes `&mut self`, so mutations never interleave, and records
//! are only inserted once fully built (preview included).

use std::sync::Arc;

use crate::config::Config;
use crate::error::{StoreError, StoreResult, ValidationError};
use crate::notify::{summarize_rejections, Notifier, NotifyKind};
use crate::preview::PreviewFactory;
use crate::review::rules::{build_tag_set, normalize_category};
use crate::types::{PhotoFile, PhotoId, PhotoPatch, PhotoStatus, PhotoSummary, StagedPhoto};
use crate::upload::{ReadBatch, Validator};

/// Result of staging one batch.
#[derive(Debug, Default)]
pub struct StageOutcome {
    /// Ids of the new records, in input order
    pub created: Vec<PhotoId>,
    /// Files that were refused
    pub errors: Vec<ValidationError>,
}

impl StageOutcome {
    /// True when at least one file was refused.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Report this outcome through a notification sink.
    ///
    /// All refused: one error naming the first reason. Partly refused: a
    /// warning summarizing the reasons. Anything created: a success line.
    pub fn notify(&self, notifier: &dyn Notifier) {
        if let Some(summary) = summarize_rejections(&self.errors) {
            if self.created.is_empty() {
                let first = &self.errors[0];
                notifier.notify(
                    NotifyKind::Error,
                    &format!("No valid files to upload. {first}"),
                );
            } else {
                notifier.notify(NotifyKind::Warning, &summary);
            }
        }
        if !self.created.is_empty() {
            let noun = if self.created.len() == 1 { "photo" } else { "photos" };
            notifier.notify(
                NotifyKind::Success,
                &format!("Staged {} {noun} for review", self.created.len()),
            );
        }
    }
}

/// In-memory collection of staged photo records.
pub struct PhotoStore {
    photos: Vec<StagedPhoto>,
    validator: Validator,
    previews: Arc<dyn PreviewFactory>,
    max_tags: usize,
}

impl PhotoStore {
    /// Create an empty store that validates with `config.upload`, caps tags
    /// at `config.review.max_tags`, and builds previews with `previews`.
    pub fn new(config: &Config, previews: Arc<dyn PreviewFactory>) -> Self {
        tracing::debug!("Creating photo store (previews: {})", previews.name());
        Self {
            photos: Vec::new(),
            validator: Validator::new(config.upload.clone()),
            previews,
            max_tags: config.review.max_tags,
        }
    }

    /// Validate a batch and stage every accepted file.
    ///
    /// Records are appended in input order after all previews for the
    /// batch exist.
    pub async fn stage(&mut self, files: Vec<PhotoFile>) -> StageOutcome {
        let batch = self.validator.validate_batch(files);

        let mut records = Vec::with_capacity(batch.valid.len());
        for file in batch.valid {
            let preview = self.previews.create(&file).await;
            let photo = StagedPhoto::new(file, preview);
            tracing::trace!("Staged {} as {}", photo.source.name, photo.id);
            records.push(photo);
        }

        let created: Vec<PhotoId> = records.iter().map(|p| p.id).collect();
        self.photos.extend(records);

        tracing::debug!(
            "Staged {} photos ({} rejected, {} held)",
            created.len(),
            batch.errors.len(),
            self.photos.len()
        );
        StageOutcome {
            created,
            errors: batch.errors,
        }
    }

    /// Stage the files of a batch read from disk.
    ///
    /// Files refused while loading are reported ahead of the ones refused
    /// here, so one outcome covers the whole intake.
    pub async fn stage_read(&mut self, batch: ReadBatch) -> StageOutcome {
        let mut outcome = self.stage(batch.files).await;
        outcome.errors.splice(0..0, batch.errors);
        outcome
    }

    /// Merge a patch into the record with `id`.
    ///
    /// Tags are normalized and checked first; on failure nothing is
    /// written. Id, timestamp, preview and status are never touched.
    pub fn update(&mut self, id: PhotoId, patch: PhotoPatch) -> StoreResult<()> {
        let max_tags = self.max_tags;
        let photo = self.get_mut(id).ok_or(StoreError::NotFound(id))?;

        let tags = match &patch.tags {
            Some(tags) => Some(build_tag_set(tags, max_tags)?),
            None => None,
        };

        if let Some(title) = patch.title {
            photo.title = title;
        }
        if let Some(description) = patch.description {
            photo.description = description;
        }
        if let Some(category) = patch.category {
            photo.category = normalize_category(&category);
        }
        if let Some(tags) = tags {
            photo.tags = tags;
        }

        tracing::trace!("Updated {}", id);
        Ok(())
    }

    /// Delete the record and release its preview.
    ///
    /// Returns `false` if no such record existed.
    pub fn remove(&mut self, id: PhotoId) -> bool {
        let Some(index) = self.photos.iter().position(|p| p.id == id) else {
            return false;
        };
        // Dropping the record drops its preview handle.
        let photo = self.photos.remove(index);
        tracing::debug!("Removed {} ({})", id, photo.source.name);
        true
    }

    /// Mark a staged record as confirmed. Already-confirmed records are
    /// left as they are.
    pub fn confirm(&mut self, id: PhotoId) -> StoreResult<()> {
        let photo = self.get_mut(id).ok_or(StoreError::NotFound(id))?;
        if photo.status == PhotoStatus::Staged {
            photo.status = PhotoStatus::Confirmed;
            tracing::debug!("Confirmed {}", id);
        }
        Ok(())
    }

    /// Confirm every record that is staged right now.
    ///
    /// Returns the ids that changed state.
    pub fn confirm_all(&mut self) -> Vec<PhotoId> {
        let mut confirmed = Vec::new();
        for photo in self.photos.iter_mut().filter(|p| p.is_staged()) {
            photo.status = PhotoStatus::Confirmed;
            confirmed.push(photo.id);
        }
        tracing::debug!("Confirmed {} photos", confirmed.len());
        confirmed
    }

    /// Remove every staged record, keeping confirmed ones.
    ///
    /// Returns the number of records removed.
    pub fn clear(&mut self) -> usize {
        let before = self.photos.len();
        self.photos.retain(|p| p.is_confirmed());
        let removed = before - self.photos.len();
        tracing::debug!("Cleared {} staged photos", removed);
        removed
    }

    /// Staged records in insertion order.
    pub fn staged(&self) -> Vec<&StagedPhoto> {
        self.photos.iter().filter(|p| p.is_staged()).collect()
    }

    /// Confirmed records in insertion order.
    pub fn confirmed(&self) -> Vec<&StagedPhoto> {
        self.photos.iter().filter(|p| p.is_confirmed()).collect()
    }

    /// All records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StagedPhoto> {
        self.photos.iter()
    }

    pub fn get(&self, id: PhotoId) -> Option<&StagedPhoto> {
        self.photos.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: PhotoId) -> Option<&mut StagedPhoto> {
        self.photos.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PhotoId) -> bool {
        self.get(id).is_some()
    }

    /// Whether `id` names a record that is still staged.
    pub fn is_staged(&self, id: PhotoId) -> bool {
        self.get(id).is_some_and(StagedPhoto::is_staged)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Serializable snapshots of all records.
    pub fn summaries(&self) -> Vec<PhotoSummary> {
        self.photos.iter().map(StagedPhoto::summary).collect()
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }
}

impl std::fmt::Debug for PhotoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoStore")
            .field("photos", &self.photos.len())
            .field("previews", &self.previews.name())
            .field("max_tags", &self.max_tags)
            .finish()
    }
}
