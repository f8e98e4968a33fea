use base64::Engine as _;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

const BLOB_URL_PREFIX: &str = "blob:link-preview/";

#[derive(Debug, Clone)]
pub struct Blob {
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

/// In-memory home for screenshot bytes, addressed by `blob:` style URLs.
///
/// Entries only live as long as the [`ScreenshotHandle`] that created them.
#[derive(Clone, Default)]
pub struct BlobStore {
    blobs: Arc<DashMap<u64, Blob>>,
    next_id: Arc<AtomicU64>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &self,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> ScreenshotHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let blob = Blob {
            content_type: content_type.into(),
            bytes: bytes.into(),
        };
        debug!(
            id,
            content_type = %blob.content_type,
            size = blob.bytes.len(),
            "Created screenshot handle"
        );
        self.blobs.insert(id, blob);

        ScreenshotHandle {
            id,
            url: format!("{BLOB_URL_PREFIX}{id}"),
            store: self.clone(),
        }
    }

    /// Looks up a live blob by its URL, the way an `<img src>` would.
    pub fn resolve(&self, url: &str) -> Option<Blob> {
        let id = url.strip_prefix(BLOB_URL_PREFIX)?.parse::<u64>().ok()?;
        self.blobs.get(&id).map(|entry| entry.clone())
    }

    pub fn live_count(&self) -> usize {
        self.blobs.len()
    }

    fn revoke(&self, id: u64) {
        if self.blobs.remove(&id).is_some() {
            debug!(id, "Released screenshot handle");
        }
    }
}

/// A transient reference to screenshot bytes held in a [`BlobStore`].
///
/// Released exactly once: on [`ScreenshotHandle::release`] or on drop.
pub struct ScreenshotHandle {
    id: u64,
    url: String,
    store: BlobStore,
}

impl ScreenshotHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn content_type(&self) -> Option<String> {
        self.store.resolve(&self.url).map(|blob| blob.content_type)
    }

    pub fn bytes(&self) -> Option<Arc<[u8]>> {
        self.store.resolve(&self.url).map(|blob| blob.bytes)
    }

    /// Inline `data:` URL of the image, usable anywhere a blob URL is not.
    pub fn data_url(&self) -> Option<String> {
        let blob = self.store.resolve(&self.url)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&blob.bytes);
        Some(format!("data:{};base64,{}", blob.content_type, encoded))
    }

    pub fn release(self) {}
}

impl Drop for ScreenshotHandle {
    fn drop(&mut self) {
        self.store.revoke(self.id);
    }
}

impl fmt::Debug for ScreenshotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenshotHandle")
            .field("url", &self.url)
            .finish()
    }
}
