//! The catalog collaborator seam.
//!
//! The core never talks to the network. It asks a [`CatalogService`] for
//! pages, featured products and single products, and the caller supplies the
//! implementation (HTTP, in-memory, or a fallback chain of both).

use crate::catalog::Product;
use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::search::{PageSlice, QueryState};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Parameters of a page request.
///
/// Category and search are applied by the service. Price range and sort are
/// applied by the client to the returned page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRequest {
    /// Page to fetch (1-indexed).
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Category slug; `None` for all categories.
    pub category: Option<String>,
    /// Search text; `None` for no search.
    pub search: Option<String>,
}

impl CatalogRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            category: None,
            search: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// The request a query state implies.
    pub fn from_query(query: &QueryState, page_size: u32) -> Self {
        Self {
            page: query.page.max(1),
            page_size: page_size.max(1),
            category: query.category_filter().map(str::to_string),
            search: query.search_filter().map(str::to_string),
        }
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    /// Products on this page, in catalog order.
    pub items: Vec<Arc<Product>>,
    /// Total number of pages, at least 1.
    pub total_pages: u32,
    /// Total number of matching products.
    pub total_count: u64,
}

impl CatalogPage {
    pub fn new(items: Vec<Arc<Product>>, total_pages: u32, total_count: u64) -> Self {
        Self {
            items,
            total_pages: total_pages.max(1),
            total_count,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 1, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for CatalogPage {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<PageSlice<Arc<Product>>> for CatalogPage {
    fn from(slice: PageSlice<Arc<Product>>) -> Self {
        Self::new(
            slice.items,
            slice.pagination.total_pages,
            slice.pagination.total,
        )
    }
}

/// External catalog data source.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch one page of products matching the request.
    async fn fetch_page(&self, request: &CatalogRequest) -> Result<CatalogPage, CatalogError>;

    /// Featured products. Failures yield an empty list.
    async fn fetch_featured(&self) -> Vec<Arc<Product>>;

    /// A single product. Failures and unknown ids yield `None`.
    async fn fetch_by_id(&self, id: &ProductId) -> Option<Arc<Product>>;
}

#[async_trait]
impl<T: CatalogService + ?Sized> CatalogService for Arc<T> {
    async fn fetch_page(&self, request: &CatalogRequest) -> Result<CatalogPage, CatalogError> {
        (**self).fetch_page(request).await
    }

    async fn fetch_featured(&self) -> Vec<Arc<Product>> {
        (**self).fetch_featured().await
    }

    async fn fetch_by_id(&self, id: &ProductId) -> Option<Arc<Product>> {
        (**self).fetch_by_id(id).await
    }
}

/// Serves from `primary`, falling back to `fallback` when it fails.
///
/// Page requests fall back on any error. Featured and single-product lookups
/// fall back when the primary comes back empty, since those already swallow
/// errors.
#[derive(Debug, Clone)]
pub struct FallbackCatalog<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackCatalog<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

#[async_trait]
impl<P: CatalogService, F: CatalogService> CatalogService for FallbackCatalog<P, F> {
    async fn fetch_page(&self, request: &CatalogRequest) -> Result<CatalogPage, CatalogError> {
        match self.primary.fetch_page(request).await {
            Ok(page) => Ok(page),
            Err(e) => {
                warn!(error = %e, page = request.page, "catalog fetch failed, serving fallback");
                self.fallback.fetch_page(request).await
            }
        }
    }

    async fn fetch_featured(&self) -> Vec<Arc<Product>> {
        let featured = self.primary.fetch_featured().await;
        if !featured.is_empty() {
            return featured;
        }
        self.fallback.fetch_featured().await
    }

    async fn fetch_by_id(&self, id: &ProductId) -> Option<Arc<Product>> {
        match self.primary.fetch_by_id(id).await {
            Some(product) => Some(product),
            None => self.fallback.fetch_by_id(id).await,
        }
    }
}
