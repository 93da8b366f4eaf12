//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope per project conventions.
//! Paginated listings additionally carry a `paging` block describing the
//! requested page and the total element count.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// Wraps any serializable payload in the project's standard response format.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Pagination metadata returned alongside paged listings.
#[derive(Debug, Serialize)]
pub struct PageInfo {
    /// Zero-based page index that was served.
    pub current_page: i64,
    /// Number of elements per page.
    pub page_size: i64,
    /// Total number of elements across all pages.
    pub total_elements: i64,
}

/// Paged `{ "data": { "paging": ..., "content": [...] } }` envelope.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub paging: PageInfo,
    pub content: Vec<T>,
}

impl<T: Serialize> Page<T> {
    /// Assemble a page from its parts.
    pub fn new(current_page: i64, page_size: i64, total_elements: i64, content: Vec<T>) -> Self {
        Self {
            paging: PageInfo {
                current_page,
                page_size,
                total_elements,
            },
            content,
        }
    }
}
