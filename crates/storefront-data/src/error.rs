//! HTTP client error types.

use std::time::Duration;
use storefront_commerce::CatalogError;
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Failed to send the request or read the response.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Classify a `reqwest` failure. `timeout` is the limit the request ran with.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_decode() {
            FetchError::ParseError(err.to_string())
        } else if err.is_builder() {
            FetchError::InvalidUrl(err.to_string())
        } else {
            FetchError::RequestError(err.to_string())
        }
    }

    /// Whether the server answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::HttpError { status: 404, .. })
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::ParseError(e.to_string())
    }
}

impl From<FetchError> for CatalogError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::RequestError(message) | FetchError::InvalidUrl(message) => {
                CatalogError::Network(message)
            }
            FetchError::HttpError { status, message } => CatalogError::Server { status, message },
            FetchError::ParseError(message) => CatalogError::Decode(message),
            FetchError::Timeout(after) => CatalogError::Timeout(after),
        }
    }
}
