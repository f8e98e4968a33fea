//! Request controller: owns the page's transient state and drives one
//! preview request per user action.
//!
//! ```text
//! PreviewController
//! ├── input_url: String             // raw text as typed
//! ├── is_loading: bool              // a request is in flight
//! ├── result: Option<PreviewResult> // last successful preview
//! └── error_message: Option<String> // last failure notice
//! ```
//!
//! `begin()` performs the synchronous part of a generate action and hands
//! back a [`PendingRequest`]; awaiting it performs the network call and
//! writes exactly one of result or error. The state mutex is never held
//! across an await point.

use crate::blob_store::BlobStore;
use crate::fetcher::{FetchResult, Fetcher, FetcherConfig, MetadataPayload};
use crate::renderer::{render, Page};
use crate::utils::derive_domain;
use crate::{PreviewError, PreviewResult, PreviewSource, Screenshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument};

#[derive(Debug, Default)]
pub struct PreviewState {
    pub input_url: String,
    pub is_loading: bool,
    pub result: Option<PreviewResult>,
    pub error_message: Option<String>,
}

struct Shared {
    source: Arc<dyn PreviewSource>,
    blobs: BlobStore,
    state: Mutex<PreviewState>,
    disposed: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PreviewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

pub struct PreviewController {
    shared: Arc<Shared>,
}

impl PreviewController {
    pub fn new(source: Arc<dyn PreviewSource>) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                blobs: BlobStore::new(),
                state: Mutex::new(PreviewState::default()),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    pub fn with_fetcher_config(config: FetcherConfig) -> Result<Self, PreviewError> {
        Ok(Self::new(Arc::new(Fetcher::new_with_config(config)?)))
    }

    pub fn set_input(&self, input: impl Into<String>) {
        self.shared.lock().input_url = input.into();
    }

    /// Store backing local screenshot handles.
    pub fn blob_store(&self) -> &BlobStore {
        &self.shared.blobs
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&PreviewState) -> R) -> R {
        f(&*self.shared.lock())
    }

    pub fn render(&self) -> Page {
        self.with_state(render)
    }

    /// Starts a generate action.
    ///
    /// Returns `None` without touching any state when the input is blank.
    /// Otherwise loading is set, the previous error is cleared and the
    /// previous result (with its screenshot handle) is released.
    pub fn begin(&self) -> Option<PendingRequest> {
        if self.shared.is_disposed() {
            return None;
        }

        let mut state = self.shared.lock();
        if state.input_url.trim().is_empty() {
            PreviewError::InvalidInput.log();
            return None;
        }

        state.is_loading = true;
        state.error_message = None;
        let previous = state.result.take();
        let url = state.input_url.clone();
        drop(state);
        drop(previous);

        debug!(url = %url, "Generate started");
        Some(PendingRequest {
            shared: Arc::clone(&self.shared),
            url,
        })
    }

    pub async fn generate(&self) {
        if let Some(pending) = self.begin() {
            pending.complete().await;
        }
    }

    /// Releases any live screenshot handle. Responses that arrive afterwards
    /// are discarded.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let previous = self.shared.lock().result.take();
        if previous.is_some() {
            debug!("Released preview result on dispose");
        }
    }
}

impl Drop for PreviewController {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// The in-flight half of a generate action.
pub struct PendingRequest {
    shared: Arc<Shared>,
    url: String,
}

// Clears the loading flag however the request ends, including the request
// or its future being dropped before completion.
impl Drop for PendingRequest {
    fn drop(&mut self) {
        self.shared.lock().is_loading = false;
    }
}

impl PendingRequest {
    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(level = "debug", skip(self), fields(url = %self.url))]
    pub async fn complete(self) {
        let fetched = self.shared.source.fetch_preview(&self.url).await;

        if self.shared.is_disposed() {
            debug!("Controller disposed, discarding response");
            return;
        }

        let outcome = fetched.map(|response| self.build_result(response));

        let replaced = {
            let mut state = self.shared.lock();
            match outcome {
                Ok(result) => {
                    state.error_message = None;
                    state.result.replace(result)
                }
                Err(e) => {
                    e.log();
                    state.error_message = Some(e.user_message());
                    state.result.take()
                }
            }
        };
        // Last response to complete wins; whatever it displaced is released here
        drop(replaced);
    }

    fn build_result(&self, response: FetchResult) -> PreviewResult {
        match response {
            FetchResult::Image(image) => {
                let (content_type, bytes) = image.into_parts();
                let handle = self.shared.blobs.create(content_type, bytes);
                PreviewResult {
                    source_url: self.url.clone(),
                    domain: derive_domain(&self.url),
                    screenshot: Some(Screenshot::Local(handle)),
                    ..Default::default()
                }
            }
            FetchResult::Metadata(MetadataPayload {
                title,
                description,
                domain,
                keywords,
                image,
                screenshot,
            }) => PreviewResult {
                source_url: self.url.clone(),
                domain: domain.unwrap_or_default(),
                title,
                description,
                keywords: keywords.unwrap_or_default(),
                og_image: image,
                screenshot: screenshot.map(Screenshot::Remote),
            },
        }
    }
}
