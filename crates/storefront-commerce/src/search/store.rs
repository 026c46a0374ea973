//! Query state store.
//!
//! Owns the catalog query, mirrors it to and from the URL, and turns every
//! change of the effective query into a [`FetchTicket`]. Tickets carry a
//! sequence number; a response is applied only if its ticket is the latest
//! one issued, so replies that arrive out of order are dropped.

use crate::catalog::{CatalogPage, CatalogRequest, CatalogService, Product, ALL_CATEGORIES};
use crate::error::{CatalogError, CommerceError};
use crate::money::Money;
use crate::observe::{Subscribers, Subscription};
use crate::search::{
    page_window, sort_products, Filter, PageMarker, PriceRange, QueryState, SortOption,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default page size of the product grid.
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// Default timeout for a catalog fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A catalog fetch the store wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Sequence number; higher is newer.
    pub seq: u64,
    /// What to ask the catalog service for.
    pub request: CatalogRequest,
}

impl FetchTicket {
    /// Run the request against a catalog service, bounded by `timeout`.
    pub async fn run(&self, service: &dyn CatalogService, timeout: Duration) -> FetchResponse {
        let result = match tokio::time::timeout(timeout, service.fetch_page(&self.request)).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout(timeout)),
        };
        FetchResponse {
            seq: self.seq,
            result,
        }
    }
}

/// A completed fetch, tagged with its ticket's sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub seq: u64,
    pub result: Result<CatalogPage, CatalogError>,
}

/// What [`QueryStateStore::apply`] did with a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// The page is now in the view.
    Applied,
    /// The fetch failed; the view is empty and carries the error.
    Failed(CatalogError),
    /// A newer request was issued after this one; the response was dropped.
    Stale,
    /// The current page was past the last page; it was clamped and this
    /// ticket must be fetched.
    Clamped(FetchTicket),
}

/// The renderable result of the current query.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
    /// Products to show, after price filtering and sorting.
    pub items: Vec<Arc<Product>>,
    /// Total number of pages, at least 1.
    pub total_pages: u32,
    /// Total matching products as reported by the catalog.
    pub total_count: u64,
    /// A fetch is in flight.
    pub loading: bool,
    /// The last fetch failed.
    pub error: Option<CatalogError>,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 1,
            total_count: 0,
            loading: false,
            error: None,
        }
    }
}

/// Owner of the catalog query state.
#[derive(Debug)]
pub struct QueryStateStore {
    state: QueryState,
    defaults: QueryState,
    search_input: String,
    page_size: u32,
    fetch_timeout: Duration,
    latest_seq: u64,
    known_total_pages: Option<u32>,
    view: CatalogView,
    subscribers: Subscribers<QueryStateStore>,
}

impl Default for QueryStateStore {
    fn default() -> Self {
        Self::new(QueryState::default(), DEFAULT_PAGE_SIZE)
    }
}

impl QueryStateStore {
    /// Create a store starting from `defaults`.
    pub fn new(defaults: QueryState, page_size: u32) -> Self {
        Self {
            state: defaults.clone(),
            defaults,
            search_input: String::new(),
            page_size: page_size.max(1),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            latest_seq: 0,
            known_total_pages: None,
            view: CatalogView::default(),
            subscribers: Subscribers::new(),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn defaults(&self) -> &QueryState {
        &self.defaults
    }

    /// Text currently typed in the search box (not yet submitted).
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Sequence number of the most recently issued ticket.
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// URL query string for the current state.
    pub fn location(&self) -> String {
        self.state.to_query_string(&self.defaults)
    }

    /// Visible page-number window for the current view.
    pub fn page_window(&self) -> Vec<PageMarker> {
        page_window(self.state.page, self.view.total_pages)
    }

    /// Issue the initial fetch for the current state.
    pub fn load(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Re-issue the current query, e.g. after an error.
    pub fn retry(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Go to a page. Pages are clamped to `[1, total_pages]` once the total
    /// is known.
    pub fn set_page(&mut self, page: u32) -> Option<FetchTicket> {
        let mut page = page.max(1);
        if let Some(total) = self.known_total_pages {
            page = page.min(total);
        }
        if page == self.state.page {
            return None;
        }
        debug!(page, "set page");
        self.state.page = page;
        Some(self.issue())
    }

    /// Select a category; resets to page 1 when it changes.
    pub fn set_category(&mut self, category: &str) -> Option<FetchTicket> {
        let category = match category.trim() {
            "" => ALL_CATEGORIES,
            category => category,
        };
        if self.state.category.eq_ignore_ascii_case(category) {
            return None;
        }
        debug!(category, "set category");
        self.state.category = category.to_string();
        self.state.page = 1;
        self.known_total_pages = None;
        Some(self.issue())
    }

    /// Update the live search input. Does not fetch.
    pub fn set_search_term(&mut self, term: &str) {
        if self.search_input == term {
            return;
        }
        self.search_input = term.to_string();
        self.notify();
    }

    /// Submit the search input; always fetches from page 1.
    pub fn submit_search(&mut self) -> FetchTicket {
        let term = self.search_input.trim();
        if self.state.search_term != term {
            self.state.search_term = term.to_string();
            self.known_total_pages = None;
        }
        self.state.page = 1;
        debug!(search = %self.state.search_term, "submit search");
        self.issue()
    }

    /// Set the price range; resets to page 1 when it changes.
    ///
    /// An inverted range is rejected and the previous range kept.
    pub fn set_price_range(
        &mut self,
        min: Money,
        max: Money,
    ) -> Result<Option<FetchTicket>, CommerceError> {
        let range = PriceRange::new(min, max).map_err(|e| {
            warn!(error = %e, "rejected price range");
            e
        })?;
        if range == self.state.price_range {
            return Ok(None);
        }
        debug!(min = %range.min(), max = %range.max(), "set price range");
        self.state.price_range = range;
        self.state.page = 1;
        self.known_total_pages = None;
        Ok(Some(self.issue()))
    }

    /// Change the sort order; resets to page 1 when it changes.
    pub fn set_sort(&mut self, sort: SortOption) -> Option<FetchTicket> {
        if sort == self.state.sort {
            return None;
        }
        debug!(sort = sort.as_str(), "set sort");
        self.state.sort = sort;
        self.state.page = 1;
        Some(self.issue())
    }

    /// Reset every filter to its default.
    pub fn clear_filters(&mut self) -> Option<FetchTicket> {
        self.search_input.clear();
        if self.state == self.defaults {
            self.notify();
            return None;
        }
        debug!("clear filters");
        if !self.defaults.same_result_set(&self.state) {
            self.known_total_pages = None;
        }
        self.state = self.defaults.clone();
        Some(self.issue())
    }

    /// Apply an external URL (back/forward navigation, shared link).
    pub fn navigate(&mut self, query_string: &str) -> Option<FetchTicket> {
        let next = QueryState::from_query_string(query_string, &self.defaults);
        self.search_input = next.search_term.clone();
        if next == self.state {
            self.notify();
            return None;
        }
        debug!(query = query_string, "navigate");
        if !next.same_result_set(&self.state) {
            self.known_total_pages = None;
        }
        self.state = next;
        Some(self.issue())
    }

    /// Apply a fetch response to the view.
    pub fn apply(&mut self, response: FetchResponse) -> ApplyOutcome {
        if response.seq < self.latest_seq {
            warn!(
                seq = response.seq,
                latest = self.latest_seq,
                "discarding stale catalog response"
            );
            return ApplyOutcome::Stale;
        }

        let page = match response.result {
            Ok(page) => page,
            Err(e) => {
                warn!(seq = response.seq, error = %e, "catalog fetch failed");
                self.view = CatalogView {
                    error: Some(e.clone()),
                    ..CatalogView::default()
                };
                self.notify();
                return ApplyOutcome::Failed(e);
            }
        };

        self.known_total_pages = Some(page.total_pages);
        if self.state.page > page.total_pages {
            debug!(
                page = self.state.page,
                total_pages = page.total_pages,
                "clamping page past the end"
            );
            self.state.page = page.total_pages;
            return ApplyOutcome::Clamped(self.issue());
        }

        let price = Filter::PriceRange(self.state.price_range);
        let mut items: Vec<Arc<Product>> =
            page.items.into_iter().filter(|p| price.matches(p)).collect();
        sort_products(&mut items, self.state.sort);

        debug!(
            seq = response.seq,
            items = items.len(),
            total_count = page.total_count,
            "applied catalog page"
        );
        self.view = CatalogView {
            items,
            total_pages: page.total_pages,
            total_count: page.total_count,
            loading: false,
            error: None,
        };
        self.notify();
        ApplyOutcome::Applied
    }

    /// Fetch and apply a ticket, following page clamps.
    ///
    /// Convenient when no other request can be issued meanwhile. Callers
    /// that overlap requests use [`FetchTicket::run`] and [`apply`](Self::apply).
    pub async fn resolve(
        &mut self,
        service: &dyn CatalogService,
        ticket: FetchTicket,
    ) -> ApplyOutcome {
        let mut ticket = ticket;
        loop {
            let response = ticket.run(service, self.fetch_timeout).await;
            match self.apply(response) {
                ApplyOutcome::Clamped(next) => ticket = next,
                outcome => return outcome,
            }
        }
    }

    pub fn subscribe(&mut self, listener: impl Fn(&QueryStateStore) + 'static) -> Subscription {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.subscribers.unsubscribe(subscription)
    }

    fn issue(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        let ticket = FetchTicket {
            seq: self.latest_seq,
            request: CatalogRequest::from_query(&self.state, self.page_size),
        };
        debug!(seq = ticket.seq, page = ticket.request.page, "issuing catalog fetch");
        self.view.loading = true;
        self.notify();
        ticket
    }

    fn notify(&self) {
        self.subscribers.notify(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::money::Currency;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn usd(units: i64) -> Money {
        Money::units(units, Currency::USD)
    }

    fn catalog() -> InMemoryCatalog {
        let mut products = Vec::new();
        for i in 1..=20i64 {
            let category = if i <= 12 { "Home" } else { "Electronics" };
            products.push(
                Product::new(i.to_string(), format!("Item {i}"), usd(i * 10), category)
                    .with_rating((i % 5) as f64),
            );
        }
        InMemoryCatalog::new(products)
    }

    fn ids(view: &CatalogView) -> Vec<String> {
        view.items.iter().map(|p| p.id.to_string()).collect()
    }

    #[tokio::test]
    async fn test_initial_load_fills_view() {
        let service = catalog();
        let mut store = QueryStateStore::default();
        let ticket = store.load();
        assert!(store.view().loading);

        assert_eq!(store.resolve(&service, ticket).await, ApplyOutcome::Applied);
        let view = store.view();
        assert!(!view.loading);
        assert_eq!(view.total_count, 20);
        assert_eq!(view.total_pages, 3);
        assert_eq!(ids(view), vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
    }

    #[test]
    fn test_set_category_resets_page() {
        let mut store = QueryStateStore::default();
        store.set_page(3).unwrap();
        assert_eq!(store.state().page, 3);

        let ticket = store.set_category("electronics").unwrap();
        assert_eq!(store.state().page, 1);
        assert_eq!(ticket.request.page, 1);
        assert_eq!(ticket.request.category.as_deref(), Some("electronics"));

        assert!(store.set_category("Electronics").is_none());
    }

    #[test]
    fn test_blank_category_means_all() {
        let mut store = QueryStateStore::default();
        store.set_category("bags");

        let ticket = store.set_category("  ").unwrap();
        assert_eq!(store.state().category, ALL_CATEGORIES);
        assert_eq!(ticket.request.category, None);
        assert_eq!(store.location(), "");
        assert!(store.navigate(&store.location()).is_none());
        assert!(store.set_category("").is_none());
    }

    #[tokio::test]
    async fn test_page_click_after_filter_change_is_not_clamped_to_old_total() {
        let service = catalog();
        let mut store = QueryStateStore::default();
        let ticket = store.set_category("electronics").unwrap();
        store.resolve(&service, ticket).await;
        assert_eq!(store.view().total_pages, 1);

        // The wider category is still loading when page 3 is clicked.
        let pending = store.set_category("all").unwrap();
        let ticket = store.set_page(3).unwrap();
        assert_eq!(store.state().page, 3);
        assert_eq!(store.apply(pending.run(&service, DEFAULT_FETCH_TIMEOUT).await), ApplyOutcome::Stale);

        assert_eq!(store.resolve(&service, ticket).await, ApplyOutcome::Applied);
        assert_eq!(store.view().total_pages, 3);
        assert_eq!(ids(store.view()), vec!["17", "18", "19", "20"]);

        // Same for a new search term.
        store.set_search_term("item 2");
        let ticket = store.submit_search();
        store.resolve(&service, ticket).await;
        assert_eq!(store.view().total_pages, 1);
        store.set_search_term("item");
        store.submit_search();
        assert!(store.set_page(2).is_some());
    }

    #[test]
    fn test_search_input_fetches_only_on_submit() {
        let mut store = QueryStateStore::default();
        store.set_page(2);
        let before = store.latest_seq();

        store.set_search_term("item 1");
        assert_eq!(store.latest_seq(), before);
        assert_eq!(store.state().search_term, "");

        let ticket = store.submit_search();
        assert_eq!(ticket.request.search.as_deref(), Some("item 1"));
        assert_eq!(store.state().page, 1);
    }

    #[test]
    fn test_price_range_validation() {
        let mut store = QueryStateStore::default();
        store.set_page(2);
        let previous = store.state().price_range;

        assert!(store.set_price_range(usd(300), usd(100)).is_err());
        assert_eq!(store.state().price_range, previous);
        assert_eq!(store.state().page, 2);

        let ticket = store.set_price_range(usd(50), usd(100)).unwrap();
        assert!(ticket.is_some());
        assert_eq!(store.state().page, 1);

        assert!(store.set_price_range(usd(50), usd(100)).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let service = catalog();
        let mut store = QueryStateStore::default();
        let timeout = store.fetch_timeout();

        let first = store.load();
        let second = store.set_category("electronics").unwrap();
        assert!(second.seq > first.seq);

        let second_response = second.run(&service, timeout).await;
        let first_response = first.run(&service, timeout).await;

        // The older reply lands while the newer one is still pending.
        assert_eq!(store.apply(first_response.clone()), ApplyOutcome::Stale);
        assert!(store.view().items.is_empty());
        assert!(store.view().loading);

        assert_eq!(store.apply(second_response), ApplyOutcome::Applied);
        assert_eq!(store.view().total_count, 8);

        assert_eq!(store.apply(first_response), ApplyOutcome::Stale);
        assert_eq!(store.view().total_count, 8);
        assert!(store.view().items.iter().all(|p| p.category == "Electronics"));
    }

    #[tokio::test]
    async fn test_price_and_sort_apply_to_page() {
        let service = catalog();
        let mut store = QueryStateStore::default();
        store.set_sort(SortOption::PriceDesc);
        let ticket = store.set_price_range(usd(30), usd(60)).unwrap().unwrap();
        store.resolve(&service, ticket).await;

        assert_eq!(ids(store.view()), vec!["6", "5", "4", "3"]);
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_clamped() {
        let service = catalog();
        let mut store = QueryStateStore::default();
        let ticket = store.navigate("page=9").unwrap();
        assert_eq!(store.state().page, 9);

        assert_eq!(store.resolve(&service, ticket).await, ApplyOutcome::Applied);
        assert_eq!(store.state().page, 3);
        assert_eq!(ids(store.view()), vec!["17", "18", "19", "20"]);
        assert_eq!(store.location(), "page=3");

        assert!(store.set_page(42).is_none());
        assert_eq!(store.state().page, 3);
    }

    struct Failing;

    #[async_trait]
    impl CatalogService for Failing {
        async fn fetch_page(&self, _request: &CatalogRequest) -> Result<CatalogPage, CatalogError> {
            Err(CatalogError::Server {
                status: 502,
                message: "bad gateway".into(),
            })
        }

        async fn fetch_featured(&self) -> Vec<Arc<Product>> {
            Vec::new()
        }

        async fn fetch_by_id(&self, _id: &crate::ids::ProductId) -> Option<Arc<Product>> {
            None
        }
    }

    #[tokio::test]
    async fn test_fetch_error_surfaces_empty_view_and_retry() {
        let mut store = QueryStateStore::default();
        let ticket = store.load();
        let outcome = store.resolve(&Failing, ticket).await;
        assert!(matches!(outcome, ApplyOutcome::Failed(CatalogError::Server { status: 502, .. })));
        assert!(store.view().items.is_empty());
        assert!(store.view().error.is_some());
        assert!(!store.view().loading);

        let retry = store.retry();
        assert_eq!(store.resolve(&catalog(), retry).await, ApplyOutcome::Applied);
        assert!(store.view().error.is_none());
    }

    struct Hanging;

    #[async_trait]
    impl CatalogService for Hanging {
        async fn fetch_page(&self, _request: &CatalogRequest) -> Result<CatalogPage, CatalogError> {
            std::future::pending().await
        }

        async fn fetch_featured(&self) -> Vec<Arc<Product>> {
            Vec::new()
        }

        async fn fetch_by_id(&self, _id: &crate::ids::ProductId) -> Option<Arc<Product>> {
            None
        }
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let mut store =
            QueryStateStore::default().with_fetch_timeout(Duration::from_millis(10));
        let ticket = store.load();
        let outcome = store.resolve(&Hanging, ticket).await;
        assert!(matches!(outcome, ApplyOutcome::Failed(CatalogError::Timeout(_))));
    }

    #[test]
    fn test_url_sync() {
        let mut store = QueryStateStore::default();
        store.set_category("bags");
        store.set_search_term("leather");
        store.submit_search();
        store.set_page(2);
        assert_eq!(store.location(), "page=2&category=bags&search=leather");

        let mut restored = QueryStateStore::default();
        assert!(restored.navigate(&store.location()).is_some());
        assert_eq!(restored.state(), store.state());
        assert_eq!(restored.search_input(), "leather");
        assert!(restored.navigate(&store.location()).is_none());
    }

    #[test]
    fn test_clear_filters() {
        let mut store = QueryStateStore::default();
        store.set_category("bags");
        store.set_sort(SortOption::Popular);
        store.set_search_term("x");

        assert!(store.clear_filters().is_some());
        assert_eq!(store.state(), store.defaults());
        assert_eq!(store.search_input(), "");
        assert!(store.clear_filters().is_none());
    }

    #[test]
    fn test_subscribers_see_each_change() {
        let mut store = QueryStateStore::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |s| sink.borrow_mut().push((s.state().page, s.view().loading)));

        store.set_page(2);
        store.set_search_term("a");
        store.set_category("home");

        assert_eq!(*seen.borrow(), vec![(2, true), (2, true), (1, true)]);
    }

    #[tokio::test]
    async fn test_page_window_follows_view() {
        let service = catalog();
        let mut store = QueryStateStore::new(QueryState::default(), 2);
        let ticket = store.load();
        store.resolve(&service, ticket).await;
        let ticket = store.set_page(5).unwrap();
        store.resolve(&service, ticket).await;

        use PageMarker::{Ellipsis, Page};
        assert_eq!(
            store.page_window(),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }
}
