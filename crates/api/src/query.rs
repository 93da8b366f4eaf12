//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;

/// Default page size when the client does not specify one.
const DEFAULT_PAGE_SIZE: i64 = 20;
/// Upper bound on the page size a client may request.
const MAX_PAGE_SIZE: i64 = 100;

/// Generic pagination parameters (`?page=&size=`).
///
/// Pages are zero-based. Used by any handler that supports paginated listing.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    /// The zero-based page index, clamped to be non-negative.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0).max(0)
    }

    /// The page size, clamped to `1..=100` (default 20).
    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// The SQL `OFFSET` implied by page and size.
    pub fn offset(&self) -> i64 {
        self.page() * self.size()
    }
}
