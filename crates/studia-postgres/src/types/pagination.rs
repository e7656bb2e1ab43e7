//! Offset-based pagination for database queries.

use serde::{Deserialize, Serialize};

/// Maximum number of items per page.
pub const MAX_LIMIT: i64 = 100;

/// Offset-based pagination parameters for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl OffsetPagination {
    /// Creates a new pagination instance.
    ///
    /// The limit is clamped to `1..=MAX_LIMIT` and the offset to non-negative.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset: offset.max(0),
        }
    }

    /// Creates pagination from a 1-based page number and page size.
    pub fn from_page(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_LIMIT);
        Self {
            limit: page_size,
            offset: (page - 1) * page_size,
        }
    }

    /// Gets the current page number (1-based).
    pub fn page_number(&self) -> i64 {
        (self.offset / self.limit) + 1
    }

    /// Gets the page size.
    pub fn page_size(&self) -> i64 {
        self.limit
    }
}

impl Default for OffsetPagination {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

/// Result of an offset-paginated query.
#[derive(Debug, Clone)]
pub struct OffsetPage<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Total count of items matching the query (across all pages).
    pub total: i64,
}

impl<T> OffsetPage<T> {
    /// Creates a new offset page.
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    /// Maps the items to a different type.
    pub fn map<U, F>(self, f: F) -> OffsetPage<U>
    where
        F: FnMut(T) -> U,
    {
        OffsetPage {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }

    /// Total number of pages for the given pagination.
    pub fn total_pages(&self, pagination: &OffsetPagination) -> i64 {
        if self.total == 0 {
            0
        } else {
            (self.total + pagination.limit - 1) / pagination.limit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        let pagination = OffsetPagination::new(100_000, -5);
        assert_eq!(pagination.limit, MAX_LIMIT);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn from_page_computes_offset() {
        let pagination = OffsetPagination::from_page(3, 10);
        assert_eq!(pagination.offset, 20);
        assert_eq!(pagination.page_number(), 3);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = OffsetPage::new(vec![1, 2, 3], 31);
        let pagination = OffsetPagination::new(10, 0);
        assert_eq!(page.total_pages(&pagination), 4);
    }
}
