//! HTTP catalog client for the storefront.
//!
//! [`HttpCatalog`] implements [`CatalogService`] against the storefront's
//! REST API. Pair it with the bundled sample catalog to keep browsing
//! working when the API is down.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_commerce::catalog::{CatalogRequest, CatalogService, FallbackCatalog};
//! use storefront_data::{sample_catalog, HttpCatalog};
//!
//! let catalog = FallbackCatalog::new(
//!     HttpCatalog::new("https://shop.example.com/api")?,
//!     sample_catalog(),
//! );
//!
//! let page = catalog
//!     .fetch_page(&CatalogRequest::new(1, 8).with_category("electronics"))
//!     .await?;
//! ```

mod error;
mod request;
mod response;
mod sample;

pub use error::FetchError;
pub use request::Endpoints;
pub use response::{decode_page, decode_product, decode_products, Response};
pub use sample::{sample_catalog, sample_products};

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use storefront_commerce::catalog::{CatalogPage, CatalogRequest, CatalogService, Product};
use storefront_commerce::config::CatalogConfig;
use storefront_commerce::{CatalogError, ProductId};
use tracing::{debug, warn};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("storefront-data/", env!("CARGO_PKG_VERSION"));

/// Catalog service backed by the storefront REST API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    endpoints: Endpoints,
    timeout: Duration,
}

impl HttpCatalog {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;
        Self::with_client(client, base_url)
    }

    /// Use a preconfigured `reqwest` client (proxies, TLS roots, pools).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            endpoints: Endpoints::new(base_url)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, FetchError> {
        Ok(Self::new(&config.base_url)?.with_timeout(config.fetch_timeout()))
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get(&self, url: Url) -> Result<Response, FetchError> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        Response::new(status, body.to_vec()).error_for_status()
    }

    async fn try_featured(&self) -> Result<Vec<Arc<Product>>, FetchError> {
        let response = self.get(self.endpoints.featured()).await?;
        decode_products(response.bytes())
    }

    async fn try_product(&self, id: &ProductId) -> Result<Product, FetchError> {
        let response = self.get(self.endpoints.product(id)).await?;
        decode_product(response.bytes())
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn fetch_page(&self, request: &CatalogRequest) -> Result<CatalogPage, CatalogError> {
        let response = self.get(self.endpoints.products(request)).await?;
        let page = decode_page(response.bytes())?;
        debug!(
            page = request.page,
            items = page.items.len(),
            total_pages = page.total_pages,
            "fetched catalog page"
        );
        Ok(page)
    }

    async fn fetch_featured(&self) -> Vec<Arc<Product>> {
        match self.try_featured().await {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "featured products unavailable");
                Vec::new()
            }
        }
    }

    async fn fetch_by_id(&self, id: &ProductId) -> Option<Arc<Product>> {
        match self.try_product(id).await {
            Ok(product) => Some(Arc::new(product)),
            Err(e) if e.is_not_found() => {
                debug!(product = %id, "product not found");
                None
            }
            Err(e) => {
                warn!(product = %id, error = %e, "product lookup failed");
                None
            }
        }
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{sample_catalog, sample_products, Endpoints, FetchError, HttpCatalog};
}
