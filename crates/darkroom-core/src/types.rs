//! Core data types for the staged upload pipeline.
//!
//! A [`StagedPhoto`] is created when a candidate [`PhotoFile`] passes
//! validation, edited through [`PhotoPatch`]es, and confirmed once its
//! metadata is complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::preview::PreviewHandle;

/// Opaque identifier of a staged photo.
///
/// Generated once at staging time and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(Uuid);

impl PhotoId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PhotoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lifecycle state of a staged photo. Transitions only go forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoStatus {
    Staged,
    Confirmed,
}

/// A candidate file selected by the user.
///
/// The payload is immutable once constructed. `size` is always the payload
/// length.
#[derive(Clone)]
pub struct PhotoFile {
    /// File name as selected (no directory)
    pub name: String,

    /// Declared MIME type ("image/jpeg", ...)
    pub mime_type: String,

    data: Arc<[u8]>,
}

impl PhotoFile {
    /// Create a file from its name, declared MIME type and contents.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// The raw payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared read-only reference to the payload, for preview rendering.
    pub(crate) fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// File name component of a path, or "unknown".
    pub fn name_from_path(path: &Path) -> String {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}

impl fmt::Debug for PhotoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size())
            .finish()
    }
}

/// A photo held locally with editable metadata.
#[derive(Debug)]
pub struct StagedPhoto {
    pub(crate) id: PhotoId,
    pub(crate) source: PhotoFile,
    pub(crate) preview: PreviewHandle,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) category: Option<String>,
    pub(crate) tags: BTreeSet<String>,
    pub(crate) status: PhotoStatus,
    pub(crate) created_at: DateTime<Utc>,
}

impl StagedPhoto {
    pub(crate) fn new(source: PhotoFile, preview: PreviewHandle) -> Self {
        Self {
            id: PhotoId::new(),
            source,
            preview,
            title: String::new(),
            description: String::new(),
            category: None,
            tags: BTreeSet::new(),
            status: PhotoStatus::Staged,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> PhotoId {
        self.id
    }

    pub fn source(&self) -> &PhotoFile {
        &self.source
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Normalized tags in sorted order.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn status(&self) -> PhotoStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_staged(&self) -> bool {
        self.status == PhotoStatus::Staged
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == PhotoStatus::Confirmed
    }

    /// Whether the record has enough metadata to be confirmed.
    ///
    /// Recomputed from the current title and category on every call.
    pub fn is_complete(&self) -> bool {
        self.title.trim().chars().count() >= MIN_COMPLETE_TITLE_LEN && self.category.is_some()
    }

    /// Serializable snapshot of this record.
    pub fn summary(&self) -> PhotoSummary {
        PhotoSummary {
            id: self.id,
            file_name: self.source.name.clone(),
            mime_type: self.source.mime_type.clone(),
            file_size: self.source.size(),
            preview_url: self.preview.url().to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            tags: self.tags.iter().cloned().collect(),
            status: self.status,
            created_at: self.created_at,
            is_complete: self.is_complete(),
        }
    }
}

/// Title length a record needs before it counts as complete.
pub const MIN_COMPLETE_TITLE_LEN: usize = 3;

/// A partial metadata update. `None` fields are left untouched.
///
/// `tags` replaces the whole tag set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PhotoPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// True if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }
}

/// Serializable view of a staged photo, without its payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSummary {
    pub id: PhotoId,
    pub file_name: String,
    pub mime_type: String,
    pub file_size: u64,
    pub preview_url: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub status: PhotoStatus,
    pub created_at: DateTime<Utc>,
    pub is_complete: bool,
}
