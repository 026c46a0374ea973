//! Category types for product organization.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// Slug that selects every category.
pub const ALL_CATEGORIES: &str = "all";

/// A category offered in the catalog filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Category slug, compared case-insensitively with `Product::category`.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Check if this is the catch-all entry.
    pub fn is_all(&self) -> bool {
        self.id.as_str() == ALL_CATEGORIES
    }

    /// The category list shown by the storefront sidebar.
    pub fn defaults() -> Vec<Category> {
        [
            (ALL_CATEGORIES, "All Categories"),
            ("sneakers", "Sneakers"),
            ("clothing", "Clothing"),
            ("bags", "Bags"),
            ("electronics", "Electronics"),
            ("furniture", "Furniture"),
            ("home", "Home"),
            ("accessories", "Accessories"),
        ]
        .into_iter()
        .map(|(id, name)| Category::new(id, name))
        .collect()
    }
}
