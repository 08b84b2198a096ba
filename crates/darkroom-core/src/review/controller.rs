//! Selection and bulk editing on top of a [`PhotoStore`].
//!
//! The controller keeps only a set of selected ids. The store is passed in
//! on every call, so the controller never holds a second copy of photo
//! data and never outlives the records it points at.

use crate::config::ReviewConfig;
use crate::error::{PatchError, StoreError, StoreResult};
use crate::store::PhotoStore;
use crate::types::{PhotoId, PhotoPatch, StagedPhoto};

use super::rules::{normalize_tag, FieldRules};

/// One field set to one value across the selection.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkEdit {
    Title(String),
    Description(String),
    Category(String),
    /// Replace the whole tag set
    Tags(Vec<String>),
    /// Add one tag to each record's existing set
    AddTag(String),
}

/// A bulk edit that did not apply to one record.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkFailure {
    pub id: PhotoId,
    pub reason: StoreError,
}

/// Aggregate result of [`ReviewController::bulk_apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkReport {
    pub succeeded: Vec<PhotoId>,
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Selection state and field-validated editing for the review step.
#[derive(Debug, Clone, Default)]
pub struct ReviewController {
    rules: FieldRules,
    // Selection order; ids may go stale until the next prune.
    selected: Vec<PhotoId>,
}

impl ReviewController {
    pub fn new(config: ReviewConfig) -> Self {
        Self {
            rules: FieldRules::new(config),
            selected: Vec::new(),
        }
    }

    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }

    /// Flip selection of a staged record.
    ///
    /// Ids that are not staged in `store` are ignored. Returns whether the
    /// id is selected afterwards.
    pub fn toggle_select(&mut self, store: &PhotoStore, id: PhotoId) -> bool {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
            return false;
        }
        if !store.is_staged(id) {
            tracing::trace!("Ignoring selection of unknown photo {}", id);
            return false;
        }
        self.selected.push(id);
        true
    }

    /// Select every staged record.
    pub fn select_all(&mut self, store: &PhotoStore) {
        self.selected = store.staged().iter().map(|p| p.id()).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Selected ids that still name staged records, in store order.
    pub fn selected(&self, store: &PhotoStore) -> Vec<PhotoId> {
        store
            .staged()
            .iter()
            .map(|p| p.id())
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    pub fn is_selected(&self, store: &PhotoStore, id: PhotoId) -> bool {
        self.selected.contains(&id) && store.is_staged(id)
    }

    /// Drop selected ids that no longer name staged records.
    ///
    /// Returns how many were dropped.
    pub fn prune(&mut self, store: &PhotoStore) -> usize {
        let before = self.selected.len();
        self.selected.retain(|id| store.is_staged(*id));
        before - self.selected.len()
    }

    /// Check a patch against the field rules without applying it.
    pub fn check_patch(&self, patch: &PhotoPatch) -> Vec<PatchError> {
        self.rules.check_patch(patch)
    }

    /// Validate a patch and apply it to one staged record.
    ///
    /// Confirmed records are read-only here and report `NotStaged`.
    pub fn edit(&self, store: &mut PhotoStore, id: PhotoId, patch: PhotoPatch) -> StoreResult<()> {
        staged(store, id)?;
        self.rules.validate_patch(&patch)?;
        store.update(id, patch)
    }

    /// Add one tag to a record.
    pub fn add_tag(&self, store: &mut PhotoStore, id: PhotoId, tag: &str) -> StoreResult<()> {
        let photo = staged(store, id)?;
        let tag = normalize_tag(tag);
        if tag.is_empty() {
            return Err(PatchError::EmptyTag.into());
        }
        if photo.tags().contains(&tag) {
            return Err(PatchError::DuplicateTag(tag).into());
        }
        let tags: Vec<String> = photo.tags().iter().cloned().chain([tag]).collect();
        self.edit(store, id, PhotoPatch::default().tags(tags))
    }

    /// Remove one tag from a record. Returns whether the tag was present.
    pub fn remove_tag(&self, store: &mut PhotoStore, id: PhotoId, tag: &str) -> StoreResult<bool> {
        let photo = staged(store, id)?;
        let tag = normalize_tag(tag);
        if !photo.tags().contains(&tag) {
            return Ok(false);
        }
        let tags: Vec<String> = photo.tags().iter().filter(|t| **t != tag).cloned().collect();
        store.update(id, PhotoPatch::default().tags(tags))?;
        Ok(true)
    }

    /// Remove a record from the store and from the selection.
    pub fn remove(&mut self, store: &mut PhotoStore, id: PhotoId) -> bool {
        self.selected.retain(|s| *s != id);
        store.remove(id)
    }

    /// Apply one edit to every selected id independently.
    ///
    /// Removed ids report `NotFound` and confirmed ones `NotStaged`, so only
    /// the records in [`selected`](Self::selected) change. A failure on one
    /// id never blocks the others. Stale ids are pruned afterwards.
    pub fn bulk_apply(&mut self, store: &mut PhotoStore, edit: BulkEdit) -> BulkReport {
        let mut report = BulkReport::default();

        for id in self.selected.clone() {
            let result = match &edit {
                BulkEdit::Title(title) => {
                    self.edit(store, id, PhotoPatch::default().title(title.as_str()))
                }
                BulkEdit::Description(description) => self.edit(
                    store,
                    id,
                    PhotoPatch::default().description(description.as_str()),
                ),
                BulkEdit::Category(category) => {
                    self.edit(store, id, PhotoPatch::default().category(category.as_str()))
                }
                BulkEdit::Tags(tags) => {
                    self.edit(store, id, PhotoPatch::default().tags(tags.iter().cloned()))
                }
                BulkEdit::AddTag(tag) => self.add_tag(store, id, tag),
            };

            match result {
                Ok(()) => report.succeeded.push(id),
                Err(reason) => {
                    tracing::debug!("Bulk edit skipped {}: {}", id, reason);
                    report.failed.push(BulkFailure { id, reason });
                }
            }
        }

        self.prune(store);
        tracing::debug!(
            "Bulk edit: {} succeeded, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        report
    }

    /// Confirm every staged record whose metadata is complete.
    pub fn confirm_complete(&mut self, store: &mut PhotoStore) -> Vec<PhotoId> {
        let ready: Vec<PhotoId> = store
            .staged()
            .into_iter()
            .filter(|p| Self::is_complete(p))
            .map(|p| p.id())
            .collect();
        for id in &ready {
            // Ids come from the staged view just above.
            if let Err(e) = store.confirm(*id) {
                tracing::warn!("Could not confirm {}: {}", id, e);
            }
        }
        self.prune(store);
        ready
    }

    /// Whether `photo` may be confirmed: title of at least three characters
    /// and a category.
    pub fn is_complete(photo: &StagedPhoto) -> bool {
        photo.is_complete()
    }
}

/// Look up a record that may still be edited.
fn staged(store: &PhotoStore, id: PhotoId) -> StoreResult<&StagedPhoto> {
    let photo = store.get(id).ok_or(StoreError::NotFound(id))?;
    if photo.is_confirmed() {
        return Err(StoreError::NotStaged(id));
    }
    Ok(photo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::preview::PreviewRegistry;
    use crate::types::PhotoFile;
    use std::sync::Arc;

    async fn setup(n: usize) -> (PhotoStore, ReviewController, Vec<PhotoId>) {
        let config = Config::default();
        let mut store = PhotoStore::new(&config, Arc::new(PreviewRegistry::new()));
        let files = (0..n)
            .map(|i| PhotoFile::new(format!("p{i}.jpg"), "image/jpeg", vec![0u8; 16]))
            .collect();
        let ids = store.stage(files).await.created;
        (store, ReviewController::new(config.review), ids)
    }

    #[tokio::test]
    async fn test_toggle_select() {
        let (store, mut review, ids) = setup(2).await;
        assert!(review.toggle_select(&store, ids[0]));
        assert_eq!(review.selected(&store), vec![ids[0]]);
        assert!(!review.toggle_select(&store, ids[0]));
        assert!(review.selected(&store).is_empty());
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_noop() {
        let (store, mut review, _) = setup(1).await;
        assert!(!review.toggle_select(&store, PhotoId::new()));
        assert!(review.selected(&store).is_empty());
    }

    #[tokio::test]
    async fn test_select_all_and_deselect_all() {
        let (store, mut review, ids) = setup(3).await;
        review.select_all(&store);
        assert_eq!(review.selected(&store), ids);
        review.deselect_all();
        assert!(review.selected(&store).is_empty());
    }

    #[tokio::test]
    async fn test_selection_heals_after_store_removal() {
        let (mut store, mut review, ids) = setup(2).await;
        review.toggle_select(&store, ids[0]);
        review.toggle_select(&store, ids[1]);

        store.remove(ids[0]);
        assert_eq!(review.selected(&store), vec![ids[1]]);
        assert!(!review.is_selected(&store, ids[0]));
        assert_eq!(review.prune(&store), 1);
    }

    #[tokio::test]
    async fn test_bulk_category_with_removed_id() {
        let (mut store, mut review, ids) = setup(5).await;
        review.select_all(&store);
        store.remove(ids[2]);

        let report = review.bulk_apply(&mut store, BulkEdit::Category("landscape".to_string()));

        assert_eq!(report.succeeded.len(), 4);
        assert_eq!(
            report.failed,
            vec![BulkFailure {
                id: ids[2],
                reason: StoreError::NotFound(ids[2]),
            }]
        );
        for id in &report.succeeded {
            assert_eq!(store.get(*id).unwrap().category(), Some("landscape"));
        }
        assert_eq!(review.selected(&store).len(), 4);
    }

    #[tokio::test]
    async fn test_bulk_skips_confirmed_record() {
        let (mut store, mut review, ids) = setup(2).await;
        review.select_all(&store);
        store.confirm(ids[0]).unwrap();
        assert_eq!(review.selected(&store), vec![ids[1]]);

        let report = review.bulk_apply(&mut store, BulkEdit::Title("Changed".to_string()));

        assert_eq!(report.succeeded, vec![ids[1]]);
        assert_eq!(
            report.failed,
            vec![BulkFailure {
                id: ids[0],
                reason: StoreError::NotStaged(ids[0]),
            }]
        );
        assert!(store.get(ids[0]).unwrap().title().is_empty());
        assert_eq!(store.get(ids[1]).unwrap().title(), "Changed");
        assert_eq!(review.prune(&store), 0);
    }

    #[tokio::test]
    async fn test_confirmed_record_rejects_edits() {
        let (mut store, review, ids) = setup(1).await;
        let id = ids[0];
        review.add_tag(&mut store, id, "dune").unwrap();
        store.confirm(id).unwrap();

        assert_eq!(
            review.edit(&mut store, id, PhotoPatch::default().title("Late")),
            Err(StoreError::NotStaged(id))
        );
        assert_eq!(
            review.add_tag(&mut store, id, "sand"),
            Err(StoreError::NotStaged(id))
        );
        assert_eq!(
            review.remove_tag(&mut store, id, "dune"),
            Err(StoreError::NotStaged(id))
        );
        assert!(store.get(id).unwrap().tags().contains("dune"));
    }

    #[tokio::test]
    async fn test_bulk_invalid_value_fails_every_id() {
        let (mut store, mut review, ids) = setup(2).await;
        review.select_all(&store);

        let report = review.bulk_apply(&mut store, BulkEdit::Title("ab".to_string()));
        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert!(report.failed.iter().all(|f| matches!(
            f.reason,
            StoreError::InvalidPatch(PatchError::TitleTooShort { .. })
        )));
        assert!(store.get(ids[0]).unwrap().title().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_add_tag_isolates_failures() {
        let (mut store, mut review, ids) = setup(2).await;
        let full: Vec<String> = (0..10).map(|i| format!("t{i}")).collect();
        review
            .edit(&mut store, ids[0], PhotoPatch::default().tags(full))
            .unwrap();
        review.select_all(&store);

        let report = review.bulk_apply(&mut store, BulkEdit::AddTag("Sunset".to_string()));
        assert_eq!(report.succeeded, vec![ids[1]]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id, ids[0]);
        assert!(matches!(
            report.failed[0].reason,
            StoreError::InvalidPatch(PatchError::TooManyTags { .. })
        ));
        assert!(store.get(ids[1]).unwrap().tags().contains("sunset"));
        assert_eq!(store.get(ids[0]).unwrap().tags().len(), 10);
    }

    #[tokio::test]
    async fn test_edit_enforces_field_rules() {
        let (mut store, review, ids) = setup(1).await;
        let id = ids[0];

        let err = review
            .edit(&mut store, id, PhotoPatch::default().category("food"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidPatch(PatchError::UnknownCategory(_))
        ));

        let err = review
            .edit(&mut store, id, PhotoPatch::default().description("d".repeat(501)))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidPatch(PatchError::DescriptionTooLong { .. })
        ));

        review
            .edit(
                &mut store,
                id,
                PhotoPatch::default().title("Golden hour").category("Portrait"),
            )
            .unwrap();
        let photo = store.get(id).unwrap();
        assert_eq!(photo.category(), Some("portrait"));
        assert!(ReviewController::is_complete(photo));

        let missing = PhotoId::new();
        assert_eq!(
            review.edit(&mut store, missing, PhotoPatch::default().title("abc")),
            Err(StoreError::NotFound(missing))
        );
    }

    #[tokio::test]
    async fn test_add_and_remove_tag() {
        let (mut store, review, ids) = setup(1).await;
        let id = ids[0];

        review.add_tag(&mut store, id, " Beach ").unwrap();
        let err = review.add_tag(&mut store, id, "BEACH").unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidPatch(PatchError::DuplicateTag("beach".to_string()))
        );
        assert_eq!(
            review.add_tag(&mut store, id, "  ").unwrap_err(),
            StoreError::InvalidPatch(PatchError::EmptyTag)
        );

        assert!(review.remove_tag(&mut store, id, "beach").unwrap());
        assert!(!review.remove_tag(&mut store, id, "beach").unwrap());
        assert!(store.get(id).unwrap().tags().is_empty());
    }

    #[tokio::test]
    async fn test_remove_through_controller_deselects() {
        let (mut store, mut review, ids) = setup(2).await;
        review.select_all(&store);
        assert!(review.remove(&mut store, ids[0]));
        assert!(!review.remove(&mut store, ids[0]));
        assert_eq!(review.selected(&store), vec![ids[1]]);
    }

    #[tokio::test]
    async fn test_confirm_complete_only_confirms_ready_records() {
        let (mut store, mut review, ids) = setup(3).await;
        review.select_all(&store);
        review
            .edit(
                &mut store,
                ids[1],
                PhotoPatch::default().title("Ridge line").category("landscape"),
            )
            .unwrap();

        let confirmed = review.confirm_complete(&mut store);
        assert_eq!(confirmed, vec![ids[1]]);
        assert_eq!(store.confirmed().len(), 1);
        assert_eq!(store.staged().len(), 2);
        assert_eq!(review.selected(&store), vec![ids[0], ids[2]]);
    }
}
