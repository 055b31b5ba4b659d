//! Page/limit pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] captures a caller-supplied page number and page size,
//! clamped to sane bounds, and a [`PageInfo`] is the envelope returned next
//! to every paginated collection (current page, total pages, total item
//! count, and has-next/has-previous flags).

use serde::{Deserialize, Serialize};

/// Default page size when the caller supplies none.
pub const DEFAULT_LIMIT: u32 = 10;

/// Upper bound on the page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised by the fallible [`PageRequest`] constructor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page numbers are one-based.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// The requested page size exceeds [`MAX_LIMIT`].
    #[error("limit must not exceed {MAX_LIMIT}")]
    LimitTooLarge,
}

/// A validated one-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Fallible constructor enforcing the page and limit bounds.
    pub fn try_new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::ZeroPage);
        }
        if limit == 0 {
            return Err(PaginationError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PaginationError::LimitTooLarge);
        }
        Ok(Self { page, limit })
    }

    /// Build a request from optional query parameters, clamping out-of-range
    /// values instead of rejecting them.
    ///
    /// Missing values fall back to page 1 and [`DEFAULT_LIMIT`]; zero becomes
    /// the minimum and oversized limits are capped at [`MAX_LIMIT`].
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// One-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Row offset for the underlying query.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    /// Row limit for the underlying query.
    pub fn limit_i64(&self) -> i64 {
        i64::from(self.limit)
    }
}

/// Pagination envelope describing one page of a larger collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// One-based index of the returned page.
    pub current_page: u32,
    /// Number of pages required to hold `total` items.
    pub total_pages: u32,
    /// Total matching items across all pages.
    pub total: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl PageInfo {
    /// Describe the page produced by `request` over `total` matching items.
    pub fn new(request: PageRequest, total: u64) -> Self {
        let limit = u64::from(request.limit);
        let total_pages = total.div_ceil(limit);
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);
        Self {
            current_page: request.page,
            total_pages,
            total,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, DEFAULT_LIMIT)]
    #[case(Some(3), Some(25), 3, 25)]
    #[case(Some(0), Some(0), 1, 1)]
    #[case(Some(2), Some(10_000), 2, MAX_LIMIT)]
    fn from_query_clamps(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::from_query(page, limit);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    #[case(0, 10, PaginationError::ZeroPage)]
    #[case(1, 0, PaginationError::ZeroLimit)]
    #[case(1, MAX_LIMIT + 1, PaginationError::LimitTooLarge)]
    fn try_new_rejects_out_of_range(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: PaginationError,
    ) {
        assert_eq!(PageRequest::try_new(page, limit), Err(expected));
    }

    #[rstest]
    fn offset_skips_earlier_pages() {
        let request = PageRequest::try_new(3, 10).expect("valid request");
        assert_eq!(request.offset(), 20);
        assert_eq!(request.limit_i64(), 10);
    }

    #[rstest]
    #[case(1, 10, 0, 0, false, false)]
    #[case(1, 10, 25, 3, true, false)]
    #[case(3, 10, 25, 3, false, true)]
    #[case(2, 10, 25, 3, true, true)]
    fn page_info_flags(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] total: u64,
        #[case] expected_pages: u32,
        #[case] has_next: bool,
        #[case] has_prev: bool,
    ) {
        let info = PageInfo::new(
            PageRequest::try_new(page, limit).expect("valid request"),
            total,
        );
        assert_eq!(info.total_pages, expected_pages);
        assert_eq!(info.has_next, has_next);
        assert_eq!(info.has_prev, has_prev);
    }

    #[rstest]
    fn page_info_serializes_camel_case() {
        let info = PageInfo::new(PageRequest::default(), 12);
        let json = serde_json::to_value(&info).expect("serialize");
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], false);
    }
}
