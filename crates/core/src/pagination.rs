//! Page arithmetic for the leaderboard.

use crate::query::Window;

/// A validated 1-based page number with its page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

/// Page navigation metadata derived from the filtered row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Number of rows skipped before this page. Saturates instead of
    /// overflowing for absurd page numbers.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// The `OFFSET`/`LIMIT` window for this page.
    pub fn window(&self) -> Window {
        Window {
            offset: self.offset(),
            limit: self.limit,
        }
    }

    /// Navigation metadata for this page given the filtered `total`.
    pub fn meta(&self, total: i64) -> PageMeta {
        let total_pages = total_pages(total, self.limit);
        PageMeta {
            total,
            total_pages,
            current_page: self.page,
            has_next_page: self.page < total_pages,
            has_previous_page: self.page > 1,
        }
    }
}

/// `ceil(total / limit)`, or 0 for an empty result.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    total / limit + i64::from(total % limit != 0)
}

/// Cut one window out of an already sorted slice. Windows past the end
/// yield an empty vector.
pub fn slice_window<T: Clone>(rows: &[T], window: &Window) -> Vec<T> {
    let len = rows.len();
    let start = usize::try_from(window.offset).unwrap_or(usize::MAX).min(len);
    let limit = usize::try_from(window.limit).unwrap_or(0);
    let end = start.saturating_add(limit).min(len);
    rows[start..end].to_vec()
}
