//! Preview handles for staged photos.
//!
//! A [`PreviewHandle`] is a revocable, process-local reference that lets a
//! payload be displayed without reading it again. Handles release
//! themselves when dropped, so removing a record from the store (or
//! dropping the store) always frees its preview.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::types::PhotoFile;

/// Releases preview resources identified by URL.
pub trait Revoke: Send + Sync {
    fn revoke(&self, url: &str);
}

/// Owned reference to a displayable rendering of a payload.
///
/// Not `Clone`: exactly one owner releases it.
pub struct PreviewHandle {
    url: String,
    // Taken on drop so the revoke runs once.
    revoker: Option<Arc<dyn Revoke>>,
}

impl PreviewHandle {
    /// Create a handle whose release is delegated to `revoker`.
    pub fn new(url: impl Into<String>, revoker: Arc<dyn Revoke>) -> Self {
        Self {
            url: url.into(),
            revoker: Some(revoker),
        }
    }

    /// The URL a renderer can display.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if let Some(revoker) = self.revoker.take() {
            revoker.revoke(&self.url);
        }
    }
}

/// Capability that turns a payload into a preview handle.
///
/// Uses `async_trait` because the store holds it as `Arc<dyn PreviewFactory>`
/// and creating a preview may suspend on I/O.
#[async_trait]
pub trait PreviewFactory: Send + Sync {
    /// Factory name for logging.
    fn name(&self) -> &str;

    /// Create a preview handle for `file`.
    async fn create(&self, file: &PhotoFile) -> PreviewHandle;
}

/// A resolved preview: MIME type plus the bytes to display.
#[derive(Debug, Clone)]
pub struct Preview {
    pub mime_type: String,
    pub data: Arc<[u8]>,
}

#[derive(Default)]
struct RegistryInner {
    entries: Mutex<HashMap<String, Preview>>,
}

impl RegistryInner {
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Preview>> {
        // Entries stay consistent even if a holder panicked mid-operation.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Revoke for RegistryInner {
    fn revoke(&self, url: &str) {
        if self.entries().remove(url).is_some() {
            tracing::trace!("Revoked preview {}", url);
        }
    }
}

/// In-memory preview registry issuing `blob:` style URLs.
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<RegistryInner>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload and return the handle that owns the entry.
    pub fn register(&self, file: &PhotoFile) -> PreviewHandle {
        let url = format!("blob:darkroom/{}", Uuid::new_v4());
        self.inner.entries().insert(
            url.clone(),
            Preview {
                mime_type: file.mime_type.clone(),
                data: file.shared_data(),
            },
        );
        tracing::trace!("Registered preview {} for {}", url, file.name);
        let revoker: Arc<dyn Revoke> = self.inner.clone();
        PreviewHandle::new(url, revoker)
    }

    /// Look up a live preview by URL.
    pub fn resolve(&self, url: &str) -> Option<Preview> {
        self.inner.entries().get(url).cloned()
    }

    /// Number of previews not yet released.
    pub fn live_count(&self) -> usize {
        self.inner.entries().len()
    }
}

impl fmt::Debug for PreviewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

#[async_trait]
impl PreviewFactory for PreviewRegistry {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create(&self, file: &PhotoFile) -> PreviewHandle {
        self.register(file)
    }
}
