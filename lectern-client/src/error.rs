//! Client error types and non-2xx response normalization.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::warn;

use lectern_core::{ApiErrorBody, ApiErrorDetail};

/// Fixed message for backend responses carrying structured errors.
pub const API_ERRORS_MESSAGE: &str = "Content API responded with errors";

/// Fixed message for backend responses without a usable error body.
pub const API_UNEXPECTED_MESSAGE: &str = "Content API responded with unexpected error";

// ============================================================================
// Client Error
// ============================================================================

/// Error type for content API operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Required environment configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The caller passed a malformed route or query parameter set.
    #[error("Invalid input: {0}")]
    Input(String),

    /// The backend responded with a non-2xx status.
    #[error("{message} (status {status}, url {url})")]
    Api {
        /// Fixed classification message.
        message: &'static str,
        /// HTTP status code of the response.
        status: u16,
        /// The request URL that produced the response.
        url: String,
        /// Structured backend errors, when the body carried them.
        errors: Option<Vec<ApiErrorDetail>>,
        /// Raw body text, kept when no structured errors were found.
        body: Option<String>,
    },

    /// The HTTP transport failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A 2xx response body was not valid JSON.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Returns the HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// Error Normalization
// ============================================================================

/// Normalizes a non-2xx response into a [`ClientError::Api`].
///
/// Two explicit steps: try to decode the body as the backend's structured
/// error shape; when that yields an `errors` array, the error carries it.
/// Any other body (invalid JSON, or JSON without `errors`) falls through to
/// the raw-text variant. Every path produces an error.
pub(crate) fn normalize_api_error(status: StatusCode, url: &str, body: &str) -> ClientError {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(errors) = parsed.errors {
            warn!(status = %status, url = %url, count = errors.len(), "content API returned errors");
            return ClientError::Api {
                message: API_ERRORS_MESSAGE,
                status: status.as_u16(),
                url: url.to_string(),
                errors: Some(errors),
                body: None,
            };
        }
    }

    warn!(status = %status, url = %url, "content API returned an unexpected error");
    ClientError::Api {
        message: API_UNEXPECTED_MESSAGE,
        status: status.as_u16(),
        url: url.to_string(),
        errors: None,
        body: Some(body.to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================
