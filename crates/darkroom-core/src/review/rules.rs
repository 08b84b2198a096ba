//! Field rules for photo metadata.
//!
//! Tag rules are enforced by the store on every update; title, description
//! and category rules are enforced by the review controller before it calls
//! the store.

use std::collections::BTreeSet;

use crate::config::ReviewConfig;
use crate::error::PatchError;
use crate::types::PhotoPatch;

/// Trim and lowercase a tag.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Trim and lowercase a category. Blank input means "no category".
pub fn normalize_category(category: &str) -> Option<String> {
    let trimmed = category.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Normalize a full tag list into a set.
///
/// Fails on the first empty or duplicate tag (duplicates are detected after
/// normalization), or when the list holds more than `max_tags` entries.
pub fn build_tag_set<S: AsRef<str>>(
    tags: &[S],
    max_tags: usize,
) -> Result<BTreeSet<String>, PatchError> {
    if tags.len() > max_tags {
        return Err(PatchError::TooManyTags {
            count: tags.len(),
            max: max_tags,
        });
    }

    let mut set = BTreeSet::new();
    for tag in tags {
        let tag = normalize_tag(tag.as_ref());
        if tag.is_empty() {
            return Err(PatchError::EmptyTag);
        }
        if set.contains(&tag) {
            return Err(PatchError::DuplicateTag(tag));
        }
        set.insert(tag);
    }
    Ok(set)
}

/// Metadata rules derived from [`ReviewConfig`].
#[derive(Debug, Clone)]
pub struct FieldRules {
    config: ReviewConfig,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self::new(ReviewConfig::default())
    }
}

impl FieldRules {
    pub fn new(config: ReviewConfig) -> Self {
        Self { config }
    }

    pub fn max_tags(&self) -> usize {
        self.config.max_tags
    }

    /// Every rule the patch breaks, in field order (title, description,
    /// category, tags). Empty when the patch is acceptable.
    pub fn check_patch(&self, patch: &PhotoPatch) -> Vec<PatchError> {
        let mut errors = Vec::new();

        if let Some(title) = &patch.title {
            if let Err(e) = self.check_title(title) {
                errors.push(e);
            }
        }
        if let Some(description) = &patch.description {
            if let Err(e) = self.check_description(description) {
                errors.push(e);
            }
        }
        if let Some(category) = &patch.category {
            if let Err(e) = self.check_category(category) {
                errors.push(e);
            }
        }
        if let Some(tags) = &patch.tags {
            if let Err(e) = build_tag_set(tags, self.config.max_tags) {
                errors.push(e);
            }
        }

        errors
    }

    /// First rule the patch breaks.
    pub fn validate_patch(&self, patch: &PhotoPatch) -> Result<(), PatchError> {
        match self.check_patch(patch).into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn check_title(&self, title: &str) -> Result<(), PatchError> {
        let len = title.trim().chars().count();
        if len < self.config.title_min_len {
            return Err(PatchError::TitleTooShort {
                min: self.config.title_min_len,
            });
        }
        if len > self.config.title_max_len {
            return Err(PatchError::TitleTooLong {
                max: self.config.title_max_len,
            });
        }
        Ok(())
    }

    pub fn check_description(&self, description: &str) -> Result<(), PatchError> {
        if description.chars().count() > self.config.description_max_len {
            return Err(PatchError::DescriptionTooLong {
                max: self.config.description_max_len,
            });
        }
        Ok(())
    }

    pub fn check_category(&self, category: &str) -> Result<(), PatchError> {
        let Some(category) = normalize_category(category) else {
            return Err(PatchError::CategoryRequired);
        };
        if !self.config.categories.is_empty()
            && !self
                .config
                .categories
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(&category))
        {
            return Err(PatchError::UnknownCategory(category));
        }
        Ok(())
    }
}
