//! Page clamping for listing views.
//!
//! A listing always has at least one page, so an empty result set renders
//! as "page 1 of 1" rather than an out-of-range request.

use serde::Serialize;

/// Parse a raw `page` query value. Missing or unparseable values are page 1.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(1)
}

/// A clamped page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Current page (1-based, always within `1..=total_pages`).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total matching items across all pages.
    pub total_items: u64,
    /// Total number of pages (at least 1).
    pub total_pages: u32,
}

impl Pagination {
    /// Clamp `requested` into range for `total_items` split into `per_page` pages.
    #[must_use]
    pub fn new(requested: u32, per_page: u32, total_items: u64) -> Self {
        let per_page = per_page.max(1);
        let pages = total_items.div_ceil(u64::from(per_page)).max(1);
        let total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
        let page = requested.clamp(1, total_pages);

        Self {
            page,
            per_page,
            total_items,
            total_pages,
        }
    }

    /// Number of items before the current page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// `OFFSET` value for SQL binding.
    #[must_use]
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset()).unwrap_or(i64::MAX)
    }

    /// `LIMIT` value for SQL binding.
    #[must_use]
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub fn previous(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    #[must_use]
    pub fn next(&self) -> u32 {
        (self.page + 1).min(self.total_pages)
    }

    /// Page numbers within `radius` of the current page, for pager links.
    #[must_use]
    pub fn window(&self, radius: u32) -> Vec<u32> {
        let start = self.page.saturating_sub(radius).max(1);
        let end = self.page.saturating_add(radius).min(self.total_pages);
        (start..=end).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let p = Pagination::new(1, 12, 25);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_page_clamped_high_and_low() {
        assert_eq!(Pagination::new(5, 12, 25).page, 3);
        assert_eq!(Pagination::new(0, 12, 25).page, 1);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let p = Pagination::new(4, 12, 0);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_offset_on_last_page() {
        let p = Pagination::new(3, 12, 25);
        assert_eq!(p.offset(), 24);
        assert_eq!(p.sql_offset(), 24);
        assert_eq!(p.sql_limit(), 12);
        assert!(!p.has_next());
        assert!(p.has_previous());
    }

    #[test]
    fn test_window_is_bounded() {
        assert_eq!(Pagination::new(1, 10, 100).window(2), vec![1, 2, 3]);
        assert_eq!(Pagination::new(5, 10, 100).window(2), vec![3, 4, 5, 6, 7]);
        assert_eq!(Pagination::new(10, 10, 100).window(2), vec![8, 9, 10]);
        assert_eq!(Pagination::new(1, 10, 0).window(2), vec![1]);
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let p = Pagination::new(2, 0, 3);
        assert_eq!(p.per_page, 1);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.page, 2);
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some("undefined")), 1);
        assert_eq!(parse_page(Some("-2")), 1);
        assert_eq!(parse_page(None), 1);
        // Zero parses and is clamped later by `Pagination::new`.
        assert_eq!(parse_page(Some("0")), 0);
    }
}
