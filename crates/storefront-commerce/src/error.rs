//! Commerce error types.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Price range with min above max.
    #[error("Invalid price range: min {min} is above max {max}")]
    InvalidPriceRange { min: String, max: String },

    /// Product data violates catalog invariants.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog collaborator failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Failures reported by a [`CatalogService`](crate::catalog::CatalogService).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Transport failure (connection refused, DNS, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The catalog server answered with an error status.
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// No answer within the configured fetch timeout.
    #[error("Catalog request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body could not be decoded.
    #[error("Failed to decode catalog response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Whether re-issuing the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Network(_) | CatalogError::Timeout(_) => true,
            CatalogError::Server { status, .. } => *status >= 500,
            CatalogError::Decode(_) => false,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Decode(e.to_string())
    }
}
