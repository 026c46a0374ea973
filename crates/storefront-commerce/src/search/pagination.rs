//! Pagination: page slices and the visible page-number window.

use serde::{Deserialize, Serialize};

/// Pages shown without any ellipsis.
pub const MAX_PAGES_WITHOUT_ELLIPSIS: u32 = 5;

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u64,
    /// Total number of pages, at least 1.
    pub total_pages: u32,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = total_pages(total, per_page);

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Offset of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.per_page as usize
    }

    /// Clamp a requested page into `[1, total_pages]`.
    pub fn clamp_page(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages)
    }

    /// Check if on first page.
    pub fn is_first(&self) -> bool {
        self.page <= 1
    }

    /// Check if on last page.
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }

    /// Get start item number (1-indexed).
    pub fn start_item(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.offset() as u64 + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> u64 {
        (self.page as u64 * self.per_page as u64).min(self.total)
    }

    /// Visible page-number window for this page.
    pub fn window(&self) -> Vec<PageMarker> {
        page_window(self.page, self.total_pages)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 8, 0)
    }
}

/// `ceil(total / per_page)`, never below 1.
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if total == 0 || per_page == 0 {
        return 1;
    }
    let pages = total.div_ceil(per_page as u64);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One page of a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<T> {
    /// Items on the requested page.
    pub items: Vec<T>,
    /// Pagination info for the whole set.
    pub pagination: Pagination,
}

/// Slice `items` to `page`.
///
/// The page is taken as given; callers clamp it. A page past the end yields
/// no items.
pub fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32) -> PageSlice<T> {
    let pagination = Pagination::new(page, per_page, items.len() as u64);
    let start = pagination.offset().min(items.len());
    let end = start.saturating_add(per_page as usize).min(items.len());
    PageSlice {
        items: items[start..end].to_vec(),
        pagination,
    }
}

/// An entry in the page-number window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageMarker {
    /// A clickable page number.
    Page(u32),
    /// One or more collapsed pages.
    Ellipsis,
}

/// Page numbers to render around `current`.
///
/// Up to five pages are listed in full. Beyond that the first and last pages
/// are always present, the neighbours of `current` are listed, the window
/// widens to three pages at either edge, and collapsed runs become a single
/// [`PageMarker::Ellipsis`].
pub fn page_window(current: u32, total_pages: u32) -> Vec<PageMarker> {
    if total_pages <= MAX_PAGES_WITHOUT_ELLIPSIS {
        return (1..=total_pages).map(PageMarker::Page).collect();
    }

    let last = total_pages;
    let mut start = current.saturating_sub(1).max(2);
    let mut end = current.saturating_add(1).min(last - 1);

    if start == 2 {
        end = 4.min(last - 1);
    }
    if end == last - 1 {
        start = last.saturating_sub(3).max(2);
    }

    let mut window = Vec::with_capacity(7);
    window.push(PageMarker::Page(1));
    if start > 2 {
        window.push(PageMarker::Ellipsis);
    }
    window.extend((start..=end).map(PageMarker::Page));
    if end < last - 1 {
        window.push(PageMarker::Ellipsis);
    }
    window.push(PageMarker::Page(last));
    window
}
