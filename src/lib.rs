use async_trait::async_trait;

mod blob_store;
mod controller;
mod error;
mod fetcher;
#[cfg(feature = "logging")]
mod logging;
mod renderer;
mod utils;

pub use blob_store::{Blob, BlobStore, ScreenshotHandle};
pub use controller::{PendingRequest, PreviewController, PreviewState};
pub use error::{
    PreviewError, INVALID_PAYLOAD_NOTICE, SERVICE_ERROR_NOTICE, TRANSPORT_FAILURE_NOTICE,
};
pub use fetcher::{
    FetchResult, Fetcher, FetcherConfig, ImagePayload, MetadataPayload, ServiceMode,
    DEFAULT_SCREENSHOT_ENDPOINT, PREVIEW_API_PATH,
};
#[cfg(feature = "logging")]
pub use logging::{
    format_preview_card, log_error_card, log_preview_card, setup_logging, LogConfig, LogLevelGuard,
};
pub use renderer::{
    render, GenerateControl, MetadataPanel, Page, Platform, ScreenshotPanel, SocialCard,
    PLACEHOLDER,
};
pub use utils::{derive_domain, truncate_str};

/// Where a result's screenshot lives.
#[derive(Debug)]
pub enum Screenshot {
    /// Remote image URL supplied by the metadata service.
    Remote(String),
    /// Image bytes fetched from the screenshot service, held locally.
    Local(ScreenshotHandle),
}

impl Screenshot {
    /// Image source suitable for display.
    pub fn src(&self) -> &str {
        match self {
            Screenshot::Remote(url) => url,
            Screenshot::Local(handle) => handle.url(),
        }
    }
}

#[derive(Debug, Default)]
pub struct PreviewResult {
    pub source_url: String,
    pub domain: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub og_image: Option<String>,
    pub screenshot: Option<Screenshot>,
}

/// Anything that can answer a preview request for a raw user input.
#[async_trait]
pub trait PreviewSource: Send + Sync {
    async fn fetch_preview(&self, url: &str) -> Result<FetchResult, PreviewError>;
}
