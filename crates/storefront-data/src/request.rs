//! Catalog API endpoints.

use crate::FetchError;
use reqwest::Url;
use storefront_commerce::catalog::CatalogRequest;
use storefront_commerce::ProductId;

/// URLs of the catalog API under a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse the API root, e.g. `https://shop.example.com/api`.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `GET {base}/products?page=&limit=&category=&search=`
    ///
    /// Category and search are only sent when set.
    pub fn products(&self, request: &CatalogRequest) -> Url {
        let mut url = self.join(&["products"]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("page", &request.page.to_string())
                .append_pair("limit", &request.page_size.to_string());
            if let Some(category) = &request.category {
                query.append_pair("category", category);
            }
            if let Some(search) = &request.search {
                query.append_pair("search", search);
            }
        }
        url
    }

    /// `GET {base}/products/featured`
    pub fn featured(&self) -> Url {
        self.join(&["products", "featured"])
    }

    /// `GET {base}/products/{id}`
    pub fn product(&self, id: &ProductId) -> Url {
        self.join(&["products", id.as_str()])
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_url() {
        let endpoints = Endpoints::new("http://localhost:3000/api/").unwrap();
        let request = CatalogRequest::new(2, 8)
            .with_category("electronics")
            .with_search("smart watch");
        assert_eq!(
            endpoints.products(&request).as_str(),
            "http://localhost:3000/api/products?page=2&limit=8&category=electronics&search=smart+watch"
        );
        assert_eq!(
            endpoints.products(&CatalogRequest::new(1, 10)).as_str(),
            "http://localhost:3000/api/products?page=1&limit=10"
        );
    }

    #[test]
    fn test_item_urls() {
        let endpoints = Endpoints::new("https://shop.example.com/api").unwrap();
        assert_eq!(
            endpoints.featured().as_str(),
            "https://shop.example.com/api/products/featured"
        );
        assert_eq!(
            endpoints.product(&ProductId::new("a b/c")).as_str(),
            "https://shop.example.com/api/products/a%20b%2Fc"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(Endpoints::new("not a url"), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(Endpoints::new("mailto:shop@example.com"), Err(FetchError::InvalidUrl(_))));
    }
}
