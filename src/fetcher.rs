use crate::{PreviewError, PreviewSource};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use url::Url;

pub const PREVIEW_API_PATH: &str = "/api/preview";
pub const DEFAULT_SCREENSHOT_ENDPOINT: &str = "https://api.empiretech.net.ng/api/search/ssweb";

/// Which contract the preview service speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    /// First-party endpoint answering with JSON metadata.
    Metadata,
    /// Screenshot endpoint answering with raw image bytes.
    Screenshot,
}

/// JSON body of the metadata endpoint. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub image: Option<String>,
    pub screenshot: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Image bytes whose declared content type has been checked.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    content_type: String,
    bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self, PreviewError> {
        let content_type = content_type.into();
        ensure_image(&content_type)?;
        Ok(Self {
            content_type,
            bytes,
        })
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.content_type, self.bytes)
    }
}

fn ensure_image(content_type: &str) -> Result<(), PreviewError> {
    if content_type.starts_with("image/") {
        Ok(())
    } else {
        Err(PreviewError::InvalidPayload(content_type.to_string()))
    }
}

/// The two shapes a successful response can take.
#[derive(Debug, Clone)]
pub enum FetchResult {
    Image(ImagePayload),
    Metadata(MetadataPayload),
}

/// Preview service configuration.
///
/// # Examples
/// ```ignore
/// let config = FetcherConfig::metadata("http://localhost:3000")?
///     .with_timeout(Duration::from_secs(20));
/// let fetcher = Fetcher::new_with_config(config)?;
/// ```
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub endpoint: Url,
    pub mode: ServiceMode,
    pub user_agent: String,
    pub timeout: Option<Duration>,
    pub headers: Option<HeaderMap>,
}

impl FetcherConfig {
    /// `GET {base_url}/api/preview?url=...`
    pub fn metadata(base_url: &str) -> Result<Self, PreviewError> {
        let endpoint = Url::parse(base_url)?.join(PREVIEW_API_PATH)?;
        Ok(Self::new(endpoint, ServiceMode::Metadata))
    }

    /// `GET {endpoint}?url=...`
    pub fn screenshot(endpoint: &str) -> Result<Self, PreviewError> {
        Ok(Self::new(Url::parse(endpoint)?, ServiceMode::Screenshot))
    }

    pub fn new(endpoint: Url, mode: ServiceMode) -> Self {
        Self {
            endpoint,
            mode,
            user_agent: concat!("link-preview-generator/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
            headers: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }
}

#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    endpoint: Url,
    mode: ServiceMode,
}

impl Fetcher {
    pub fn new_with_config(config: FetcherConfig) -> Result<Self, PreviewError> {
        let mut client_builder = Client::builder().user_agent(config.user_agent);

        // No timeout unless asked for; the transport default applies
        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(headers) = config.headers {
            client_builder = client_builder.default_headers(headers);
        }

        let client = client_builder.build().map_err(|e| {
            error!(error = %e, "Failed to create HTTP client");
            PreviewError::from(e)
        })?;

        debug!(endpoint = %config.endpoint, mode = ?config.mode, "Fetcher initialized");
        Ok(Self::with_client(client, config.endpoint, config.mode))
    }

    pub fn with_client(client: Client, endpoint: Url, mode: ServiceMode) -> Self {
        Self {
            client,
            endpoint,
            mode,
        }
    }

    pub fn mode(&self) -> ServiceMode {
        self.mode
    }

    /// Service URL carrying the raw input as its `url` query parameter.
    pub fn request_url(&self, url: &str) -> Url {
        let mut request_url = self.endpoint.clone();
        request_url.query_pairs_mut().append_pair("url", url);
        request_url
    }

    #[instrument(level = "debug", skip(self), err)]
    pub async fn fetch(&self, url: &str) -> Result<FetchResult, PreviewError> {
        let request_url = self.request_url(url);
        debug!(request_url = %request_url, "Sending preview request");

        let response = self.client.get(request_url).send().await.map_err(|e| {
            error!(error = %e, url = %url, "Failed to send request");
            PreviewError::TransportFailure(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            // The body is only a hint; a non-JSON error page leaves no message
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error);
            warn!(status = %status, message = ?message, "Preview service rejected request");
            return Err(PreviewError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        match self.mode {
            ServiceMode::Screenshot => {
                let content_type = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                ensure_image(&content_type)?;

                let bytes = response.bytes().await.map_err(|e| {
                    error!(error = %e, url = %url, "Failed to read response body");
                    PreviewError::TransportFailure(e.to_string())
                })?;

                debug!(content_type = %content_type, size = bytes.len(), "Received screenshot");
                Ok(FetchResult::Image(ImagePayload::new(
                    content_type,
                    bytes.to_vec(),
                )?))
            }
            ServiceMode::Metadata => {
                let payload = response.json::<MetadataPayload>().await.map_err(|e| {
                    error!(error = %e, url = %url, "Failed to parse preview response");
                    PreviewError::TransportFailure(e.to_string())
                })?;

                debug!(title = ?payload.title, domain = ?payload.domain, "Received metadata");
                Ok(FetchResult::Metadata(payload))
            }
        }
    }
}

#[async_trait]
impl PreviewSource for Fetcher {
    async fn fetch_preview(&self, url: &str) -> Result<FetchResult, PreviewError> {
        self.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_endpoint() {
        let config = FetcherConfig::metadata("http://localhost:3000").unwrap();
        assert_eq!(config.endpoint.as_str(), "http://localhost:3000/api/preview");
        assert_eq!(config.mode, ServiceMode::Metadata);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_request_url_encodes_raw_input() {
        let fetcher = Fetcher::new_with_config(
            FetcherConfig::screenshot(DEFAULT_SCREENSHOT_ENDPOINT).unwrap(),
        )
        .unwrap();

        let request_url = fetcher.request_url("https://example.com/a b?c=d&e");
        let pairs: Vec<(String, String)> = request_url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(
            pairs,
            vec![("url".to_string(), "https://example.com/a b?c=d&e".to_string())]
        );
        assert!(!request_url.query().unwrap().contains('&'));
    }

    #[test]
    fn test_image_payload_rejects_non_images() {
        assert!(ImagePayload::new("image/png", vec![1, 2, 3]).is_ok());
        assert!(matches!(
            ImagePayload::new("text/html; charset=utf-8", Vec::new()),
            Err(PreviewError::InvalidPayload(ct)) if ct == "text/html; charset=utf-8"
        ));
        assert!(matches!(
            ImagePayload::new("", Vec::new()),
            Err(PreviewError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_metadata_payload_tolerates_missing_fields() {
        let payload: MetadataPayload =
            serde_json::from_str(r#"{"title":"Example","domain":"example.com"}"#).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Example"));
        assert!(payload.keywords.is_none());
        assert!(payload.screenshot.is_none());
    }
}
