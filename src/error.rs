use thiserror::Error;
use tracing::{debug, error, warn};

pub const TRANSPORT_FAILURE_NOTICE: &str = "Unable to fetch preview.";
pub const SERVICE_ERROR_NOTICE: &str = "Failed to generate preview.";
pub const INVALID_PAYLOAD_NOTICE: &str = "Invalid response from API.";

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Failed to parse URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Input URL is empty")]
    InvalidInput,

    #[error("Failed to reach preview service: {0}")]
    TransportFailure(String),

    #[error("Preview service returned {status}{}", message_suffix(.message))]
    ServiceError {
        status: u16,
        message: Option<String>,
    },

    #[error("Invalid content type: {0}")]
    InvalidPayload(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl PreviewError {
    /// The single line shown to the user. Every failure collapses to one
    /// notice; only a service-provided message survives verbatim.
    pub fn user_message(&self) -> String {
        match self {
            PreviewError::ServiceError {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            PreviewError::ServiceError { .. } => SERVICE_ERROR_NOTICE.to_string(),
            PreviewError::InvalidPayload(_) => INVALID_PAYLOAD_NOTICE.to_string(),
            PreviewError::UrlParseError(_)
            | PreviewError::InvalidInput
            | PreviewError::TransportFailure(_) => TRANSPORT_FAILURE_NOTICE.to_string(),
        }
    }

    pub fn log(&self) {
        match self {
            PreviewError::UrlParseError(e) => {
                warn!(error = %e, "URL parsing failed");
            }
            PreviewError::InvalidInput => {
                debug!("Empty input ignored");
            }
            PreviewError::TransportFailure(e) => {
                error!(error = %e, "Preview request failed");
            }
            PreviewError::ServiceError { status, message } => {
                error!(
                    status = %status,
                    error = message.as_deref().unwrap_or("<none>"),
                    "Preview service returned an error"
                );
            }
            PreviewError::InvalidPayload(content_type) => {
                warn!(content_type = %content_type, "Invalid content type received");
            }
        }
    }
}

impl From<reqwest::Error> for PreviewError {
    fn from(e: reqwest::Error) -> Self {
        PreviewError::TransportFailure(e.to_string())
    }
}
