//! In-memory catalog: client-side filtering and pagination over a known
//! product list.

use crate::catalog::{CatalogPage, CatalogRequest, CatalogService, Product, ALL_CATEGORIES};
use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::search::{apply_filters, paginate, Filter};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// A [`CatalogService`] over products already held in memory.
///
/// Category and search are filtered exactly as the catalog filter does, then
/// the result is paginated. Used as the local fallback and in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Arc<Product>>,
}

impl InMemoryCatalog {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products.into_iter().map(Arc::new).collect(),
        }
    }

    /// Build from products that are already shared.
    pub fn from_shared(products: Vec<Arc<Product>>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Category and text matches, before pagination.
    pub fn matching(&self, request: &CatalogRequest) -> Vec<Arc<Product>> {
        let filters = [
            Filter::category(request.category.as_deref().unwrap_or(ALL_CATEGORIES)),
            Filter::text(request.search.as_deref().unwrap_or_default()),
        ];
        apply_filters(&self.products, &filters)
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn fetch_page(&self, request: &CatalogRequest) -> Result<CatalogPage, CatalogError> {
        let matching = self.matching(request);
        debug!(
            page = request.page,
            matching = matching.len(),
            "serving catalog page from memory"
        );
        Ok(paginate(&matching, request.page, request.page_size).into())
    }

    async fn fetch_featured(&self) -> Vec<Arc<Product>> {
        self.products.iter().filter(|p| p.featured).cloned().collect()
    }

    async fn fetch_by_id(&self, id: &ProductId) -> Option<Arc<Product>> {
        self.products.iter().find(|p| &p.id == id).cloned()
    }
}
