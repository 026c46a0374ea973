//! Catalog query state and its URL form.

use crate::catalog::{Product, ALL_CATEGORIES};
use crate::money::{Currency, Money};
use crate::search::PriceRange;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::form_urlencoded;

/// Sort options for the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Catalog order.
    #[default]
    Newest,
    /// Sort by effective price, low to high.
    PriceAsc,
    /// Sort by effective price, high to low.
    PriceDesc,
    /// Sort by rating, unrated products last.
    Popular,
}

impl SortOption {
    /// URL slug.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::Popular => "popular",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "newest" => Some(SortOption::Newest),
            "price-asc" => Some(SortOption::PriceAsc),
            "price-desc" => Some(SortOption::PriceDesc),
            "popular" => Some(SortOption::Popular),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::Popular => "Most Popular",
        }
    }

    /// All options in menu order.
    pub fn all() -> [SortOption; 4] {
        [
            SortOption::Newest,
            SortOption::PriceAsc,
            SortOption::PriceDesc,
            SortOption::Popular,
        ]
    }
}

/// Stable in-place sort of a result page.
pub fn sort_products(products: &mut [Arc<Product>], sort: SortOption) {
    match sort {
        SortOption::Newest => {}
        SortOption::PriceAsc => {
            products.sort_by_key(|p| p.effective_price().amount_cents);
        }
        SortOption::PriceDesc => {
            products.sort_by(|a, b| {
                b.effective_price()
                    .amount_cents
                    .cmp(&a.effective_price().amount_cents)
            });
        }
        SortOption::Popular => {
            let rating = |p: &Product| p.rating.unwrap_or(-1.0);
            products.sort_by(|a, b| rating(b).total_cmp(&rating(a)));
        }
    }
}

/// The full set of user-chosen catalog filters, sort and page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    /// Current page (1-indexed).
    pub page: u32,
    /// Category slug or `"all"`.
    pub category: String,
    /// Submitted search text.
    pub search_term: String,
    /// Effective price bounds.
    pub price_range: PriceRange,
    /// Sort option.
    pub sort: SortOption,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: 1,
            category: ALL_CATEGORIES.to_string(),
            search_term: String::new(),
            price_range: PriceRange::default(),
            sort: SortOption::Newest,
        }
    }
}

impl QueryState {
    /// Defaults with a custom price range.
    pub fn with_price_range(price_range: PriceRange) -> Self {
        Self {
            price_range,
            ..Self::default()
        }
    }

    /// Category to send to the catalog service, `None` for all.
    pub fn category_filter(&self) -> Option<&str> {
        if self.category.eq_ignore_ascii_case(ALL_CATEGORIES) || self.category.is_empty() {
            None
        } else {
            Some(&self.category)
        }
    }

    /// Search text to send to the catalog service, `None` when blank.
    pub fn search_filter(&self) -> Option<&str> {
        let term = self.search_term.trim();
        if term.is_empty() {
            None
        } else {
            Some(term)
        }
    }

    /// Whether two states select the same result set (ignoring page and sort).
    pub fn same_result_set(&self, other: &QueryState) -> bool {
        self.category.eq_ignore_ascii_case(&other.category)
            && self.search_term.trim() == other.search_term.trim()
            && self.price_range == other.price_range
    }

    /// Encode as URL query parameters, omitting values equal to `defaults`.
    pub fn to_query_string(&self, defaults: &QueryState) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        if self.page != 1 {
            ser.append_pair("page", &self.page.to_string());
        }
        if let Some(category) = self.category_filter() {
            ser.append_pair("category", category);
        }
        if let Some(search) = self.search_filter() {
            ser.append_pair("search", search);
        }
        if self.price_range.min() != defaults.price_range.min() {
            ser.append_pair("minPrice", &format_price(&self.price_range.min()));
        }
        if self.price_range.max() != defaults.price_range.max() {
            ser.append_pair("maxPrice", &format_price(&self.price_range.max()));
        }
        if self.sort != SortOption::default() {
            ser.append_pair("sort", self.sort.as_str());
        }
        ser.finish()
    }

    /// Decode URL query parameters on top of `defaults`.
    ///
    /// Decoding is lenient: unknown keys are ignored, a missing or invalid
    /// page becomes 1, and an unusable price range falls back to the default.
    pub fn from_query_string(query: &str, defaults: &QueryState) -> QueryState {
        let query = query.trim_start_matches('?');
        let mut state = QueryState {
            page: 1,
            ..defaults.clone()
        };
        let currency = defaults.price_range.min().currency;
        let mut min = defaults.price_range.min();
        let mut max = defaults.price_range.max();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => state.page = value.trim().parse::<u32>().unwrap_or(1).max(1),
                "category" => state.category = value.trim().to_string(),
                "search" => state.search_term = value.trim().to_string(),
                "minPrice" => {
                    if let Some(m) = parse_price(&value, currency) {
                        min = m;
                    }
                }
                "maxPrice" => {
                    if let Some(m) = parse_price(&value, currency) {
                        max = m;
                    }
                }
                "sort" => state.sort = SortOption::from_str(&value).unwrap_or_default(),
                _ => {}
            }
        }

        if state.category.is_empty() {
            state.category = ALL_CATEGORIES.to_string();
        }
        state.price_range = PriceRange::new(min, max).unwrap_or(defaults.price_range);
        state
    }
}

fn format_price(money: &Money) -> String {
    money.to_decimal().to_string()
}

fn parse_price(value: &str, currency: Currency) -> Option<Money> {
    let amount = value.trim().parse::<f64>().ok()?;
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    Some(Money::from_decimal(amount, currency))
}
