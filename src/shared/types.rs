use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Standard pagination query parameters for all list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// Number of items to skip for the requested page. Saturates instead of
    /// wrapping so an absurd page lands past the end.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit())
    }

    /// Get clamped page_size (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Cut the requested window out of an already ordered sequence.
    ///
    /// A page past the end yields an empty window rather than an error.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let len = usize::try_from(self.limit()).unwrap_or(0);
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(len).min(items.len());
        &items[start..end]
    }

    pub fn meta(&self, total_items: usize) -> PaginationMeta {
        PaginationMeta::new(self.page.max(1), self.limit(), total_items as i64)
    }
}

/// Pagination metadata for response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(page: i64, page_size: i64, total_items: i64) -> Self {
        let clamped_page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let total_pages = (total_items + clamped_page_size - 1) / clamped_page_size;
        Self {
            page,
            page_size: clamped_page_size,
            total_items,
            total_pages,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_returns_requested_slice() {
        let items: Vec<i32> = (1..=25).collect();
        assert_eq!(PaginationQuery::new(1, 10).window(&items), &items[0..10]);
        assert_eq!(PaginationQuery::new(3, 10).window(&items), &items[20..25]);
    }

    #[test]
    fn test_window_past_end_is_empty() {
        let items = vec![1, 2, 3];
        assert!(PaginationQuery::new(2, 10).window(&items).is_empty());
        assert!(PaginationQuery::new(1, 10).window::<i32>(&[]).is_empty());
    }

    #[test]
    fn test_huge_page_is_empty_not_aliased() {
        let items = vec![1, 2, 3];
        assert!(PaginationQuery::new(i64::MAX, 10).window(&items).is_empty());
        assert!(PaginationQuery::new((1 << 62) + 1, 4).window(&items).is_empty());
        assert_eq!(PaginationQuery::new(i64::MAX, 100).offset(), i64::MAX);
    }

    #[test]
    fn test_window_clamps_page_and_size() {
        let items: Vec<i32> = (1..=300).collect();
        assert_eq!(PaginationQuery::new(0, 5).window(&items), &items[0..5]);
        assert_eq!(PaginationQuery::new(1, 1000).window(&items).len(), 100);
        assert_eq!(PaginationQuery::new(1, 0).window(&items).len(), 1);
    }

    #[test]
    fn test_pagination_meta_counts_pages() {
        let meta = PaginationQuery::new(2, 10).meta(25);
        assert_eq!(meta, PaginationMeta::new(2, 10, 25));
        assert_eq!(meta.total_pages, 3);
        assert_eq!(PaginationQuery::default().meta(0).total_pages, 0);
    }
}
