//! Catalog filters.
//!
//! Filters are independent predicates over a product. [`filter_products`]
//! applies category, then price, then text, and keeps products that pass
//! all of them.

use crate::catalog::{Product, ALL_CATEGORIES};
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use crate::search::QueryState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inclusive effective-price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    min: Money,
    max: Money,
}

impl PriceRange {
    /// Create a price range, rejecting `min > max` and mixed currencies.
    pub fn new(min: Money, max: Money) -> Result<Self, CommerceError> {
        if min.currency != max.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: min.currency.code().to_string(),
                got: max.currency.code().to_string(),
            });
        }
        if min.amount_cents > max.amount_cents {
            return Err(CommerceError::InvalidPriceRange {
                min: min.display(),
                max: max.display(),
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Money {
        self.min
    }

    pub fn max(&self) -> Money {
        self.max
    }

    /// Check if a price lies within the bounds (inclusive).
    pub fn contains(&self, price: &Money) -> bool {
        price.currency == self.min.currency
            && price.amount_cents >= self.min.amount_cents
            && price.amount_cents <= self.max.amount_cents
    }
}

impl Default for PriceRange {
    /// `$0` to `$500`, the range of the storefront price slider.
    fn default() -> Self {
        Self {
            min: Money::zero(Currency::USD),
            max: Money::units(500, Currency::USD),
        }
    }
}

/// A catalog filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Case-insensitive category match; `"all"` matches everything.
    Category(String),
    /// Effective price within the range.
    PriceRange(PriceRange),
    /// Case-insensitive substring of name, description or category.
    Text(String),
}

impl Filter {
    /// Create a category filter.
    pub fn category(category: impl Into<String>) -> Self {
        Filter::Category(category.into())
    }

    /// Create a text search filter.
    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text(query.into())
    }

    /// The filters a query implies, in application order.
    pub fn from_query(query: &QueryState) -> Vec<Filter> {
        vec![
            Filter::Category(query.category.clone()),
            Filter::PriceRange(query.price_range),
            Filter::Text(query.search_term.clone()),
        ]
    }

    /// Test a product against this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::Category(category) => {
                category.eq_ignore_ascii_case(ALL_CATEGORIES)
                    || product.category.to_lowercase() == category.to_lowercase()
            }
            Filter::PriceRange(range) => range.contains(&product.effective_price()),
            Filter::Text(term) => {
                let term = term.trim().to_lowercase();
                term.is_empty()
                    || product.name.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
                    || product.category.to_lowercase().contains(&term)
            }
        }
    }
}

/// Apply the query's category, price and text filters, preserving order.
pub fn filter_products(products: &[Arc<Product>], query: &QueryState) -> Vec<Arc<Product>> {
    let filters = Filter::from_query(query);
    apply_filters(products, &filters)
}

/// Keep products that pass every filter, preserving order.
pub fn apply_filters(products: &[Arc<Product>], filters: &[Filter]) -> Vec<Arc<Product>> {
    products
        .iter()
        .filter(|p| filters.iter().all(|f| f.matches(p)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn catalog() -> Vec<Arc<Product>> {
        vec![
            Arc::new(
                Product::new("1", "Nike Air Max 90", usd(12999), "Sneakers")
                    .with_description("Classic shoes with air cushioning."),
            ),
            Arc::new(
                Product::new("3", "Leather Weekender Bag", usd(24999), "Bags")
                    .with_sale_price(usd(19999))
                    .with_description("Premium leather bag."),
            ),
            Arc::new(
                Product::new("6", "Bluetooth Headphones", usd(15999), "Electronics")
                    .with_sale_price(usd(12999))
                    .with_description("Wireless headphones with noise cancellation."),
            ),
            Arc::new(
                Product::new("4", "Modern Lounge Chair", usd(59999), "Furniture")
                    .with_description("Contemporary lounge chair."),
            ),
        ]
    }

    fn ids(products: &[Arc<Product>]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_default_query_is_identity_within_range() {
        let products: Vec<_> = catalog().into_iter().take(3).collect();
        let filtered = filter_products(&products, &QueryState::default());
        assert_eq!(ids(&filtered), ids(&products));
    }

    #[test]
    fn test_default_price_range_excludes_expensive() {
        let filtered = filter_products(&catalog(), &QueryState::default());
        assert_eq!(ids(&filtered), vec!["1", "3", "6"]);
    }

    #[test]
    fn test_category_case_insensitive() {
        let query = QueryState {
            category: "electronics".to_string(),
            ..QueryState::default()
        };
        assert_eq!(ids(&filter_products(&catalog(), &query)), vec!["6"]);
    }

    #[test]
    fn test_price_uses_effective_price_inclusive() {
        let query = QueryState {
            price_range: PriceRange::new(usd(12999), usd(19999)).unwrap(),
            ..QueryState::default()
        };
        assert_eq!(ids(&filter_products(&catalog(), &query)), vec!["1", "3", "6"]);

        let query = QueryState {
            price_range: PriceRange::new(usd(13000), usd(19998)).unwrap(),
            ..QueryState::default()
        };
        assert!(filter_products(&catalog(), &query).is_empty());
    }

    #[test]
    fn test_text_matches_name_description_or_category() {
        let query = QueryState {
            search_term: "LEATHER".to_string(),
            ..QueryState::default()
        };
        assert_eq!(ids(&filter_products(&catalog(), &query)), vec!["3"]);

        let query = QueryState {
            search_term: "noise".to_string(),
            ..QueryState::default()
        };
        assert_eq!(ids(&filter_products(&catalog(), &query)), vec!["6"]);

        let query = QueryState {
            search_term: "sneak".to_string(),
            ..QueryState::default()
        };
        assert_eq!(ids(&filter_products(&catalog(), &query)), vec!["1"]);
    }

    #[test]
    fn test_filters_compose_conjunctively() {
        let query = QueryState {
            category: "Bags".to_string(),
            search_term: "headphones".to_string(),
            ..QueryState::default()
        };
        assert!(filter_products(&catalog(), &query).is_empty());
    }

    #[test]
    fn test_price_range_rejects_inverted() {
        let err = PriceRange::new(usd(500), usd(100)).unwrap_err();
        assert!(matches!(err, CommerceError::InvalidPriceRange { .. }));
    }
}
