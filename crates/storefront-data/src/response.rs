//! HTTP response handling and catalog body decoding.

use crate::FetchError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use storefront_commerce::catalog::{CatalogPage, Product};

/// A buffered HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response was a server error (5xx status).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get the raw response body.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            let message = self.text().unwrap_or_else(|_| "Unknown error".to_string());
            Err(FetchError::HttpError {
                status: self.status,
                message,
            })
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageEnvelope {
    products: Vec<Product>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    total_count: Option<u64>,
}

/// The products endpoint answers either with an envelope or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageBody {
    Envelope(PageEnvelope),
    Bare(Vec<Product>),
}

impl PageBody {
    fn into_page(self) -> CatalogPage {
        let (products, total_pages, total_count) = match self {
            PageBody::Envelope(e) => (e.products, e.total_pages, e.total_count),
            PageBody::Bare(products) => (products, None, None),
        };
        let total_count = total_count.unwrap_or(products.len() as u64);
        let items = products.into_iter().map(Arc::new).collect();
        CatalogPage::new(items, total_pages.unwrap_or(1), total_count)
    }
}

/// Decode a products page. Missing totals default to one page holding
/// exactly the returned items.
pub fn decode_page(body: &[u8]) -> Result<CatalogPage, FetchError> {
    let body: PageBody = serde_json::from_slice(body)?;
    Ok(body.into_page())
}

/// Decode a product list in either body shape.
pub fn decode_products(body: &[u8]) -> Result<Vec<Arc<Product>>, FetchError> {
    decode_page(body).map(|page| page.items)
}

/// Decode a single product.
pub fn decode_product(body: &[u8]) -> Result<Product, FetchError> {
    Ok(serde_json::from_slice(body)?)
}
