//! Client-side pagination over already fetched lists

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One page of results plus the numbers a dashboard needs to draw a pager
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Slice `items` into the requested page.
///
/// Pages are 1-based. A page outside `1..=total_pages` falls back to the
/// nearest valid one; an empty list yields a single empty page 1.
pub fn paginate<T>(items: Vec<T>, page: Option<usize>, per_page: Option<usize>) -> Page<T> {
    let per_page = per_page.filter(|n| *n > 0).unwrap_or(DEFAULT_PAGE_SIZE);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let current_page = page.unwrap_or(1).clamp(1, total_pages.max(1));

    let start = (current_page - 1) * per_page;
    let items = items.into_iter().skip(start).take(per_page).collect();

    Page {
        items,
        current_page,
        per_page,
        total_items,
        total_pages,
    }
}
