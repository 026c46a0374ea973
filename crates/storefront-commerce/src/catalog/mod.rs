//! Product catalog module.
//!
//! Contains the product and category types and the catalog service seam.

mod category;
mod memory;
mod product;
mod service;

pub use category::{Category, ALL_CATEGORIES};
pub use memory::InMemoryCatalog;
pub use product::{Product, MAX_RATING};
pub use service::{CatalogPage, CatalogRequest, CatalogService, FallbackCatalog};
