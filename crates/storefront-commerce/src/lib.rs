//! Storefront domain types and logic.
//!
//! This crate is the client-side core of the storefront:
//!
//! - **Catalog**: Products, categories, and the [`CatalogService`](catalog::CatalogService) seam
//! - **Cart**: Cart lines, coupons, pricing, and the cart store
//! - **Search**: Filters, sorting, pagination, and the URL-synced query store
//!
//! Nothing here performs I/O on its own. Catalog data arrives through a
//! `CatalogService` supplied by the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_commerce::prelude::*;
//!
//! let mut cart = CartStore::default();
//! cart.add_item(product.clone(), 2)?;
//! let summary = cart.summary(Some("DISCOUNT20"))?;
//! println!("Total: {}", summary.total.display());
//!
//! let mut query = QueryStateStore::default();
//! if let Some(ticket) = query.set_category("electronics") {
//!     query.resolve(&catalog, ticket).await;
//! }
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;
pub mod observe;

pub mod cart;
pub mod catalog;
pub mod search;

pub use config::StorefrontConfig;
pub use error::{CatalogError, CommerceError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::StorefrontConfig;
    pub use crate::error::{CatalogError, CommerceError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::observe::Subscription;

    // Catalog
    pub use crate::catalog::{
        CatalogPage, CatalogRequest, CatalogService, Category, FallbackCatalog, InMemoryCatalog,
        Product,
    };

    // Cart
    pub use crate::cart::{Cart, CartLine, CartStore, CartSummary, CouponStatus, PricingEngine};

    // Search
    pub use crate::search::{
        filter_products, page_window, ApplyOutcome, CatalogView, Filter, PageMarker, PriceRange,
        QueryState, QueryStateStore, SortOption,
    };
}
