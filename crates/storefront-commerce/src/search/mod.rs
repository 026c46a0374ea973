//! Catalog search module.
//!
//! Contains the query state, filters, sorting, pagination, and the store that
//! keeps the query in sync with the URL and the catalog service.

mod filter;
mod pagination;
mod query;
mod store;

pub use filter::{apply_filters, filter_products, Filter, PriceRange};
pub use pagination::{
    page_window, paginate, total_pages, PageMarker, PageSlice, Pagination,
    MAX_PAGES_WITHOUT_ELLIPSIS,
};
pub use query::{sort_products, QueryState, SortOption};
pub use store::{
    ApplyOutcome, CatalogView, FetchResponse, FetchTicket, QueryStateStore, DEFAULT_FETCH_TIMEOUT,
    DEFAULT_PAGE_SIZE,
};
