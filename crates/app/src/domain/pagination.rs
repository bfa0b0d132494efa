//! Pagination

use thiserror::Error;

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    #[error("page must be at least 1")]
    PageOutOfRange,

    #[error("limit must be between 1 and {MAX_LIMIT}")]
    LimitOutOfRange,
}

/// A one-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// # Errors
    ///
    /// Returns an error when `page` is zero or `limit` is outside `1..=100`.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }

        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange);
        }

        Ok(Self { page, limit })
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results together with the size of the full result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            limit: request.limit(),
        }
    }

    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.limit.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn rejects_page_zero_and_oversized_limits() {
        assert_eq!(PageRequest::new(0, 10), Err(PageRequestError::PageOutOfRange));
        assert_eq!(PageRequest::new(1, 0), Err(PageRequestError::LimitOutOfRange));
        assert_eq!(PageRequest::new(1, 101), Err(PageRequestError::LimitOutOfRange));
    }

    #[test]
    fn offset_skips_previous_pages() -> TestResult {
        assert_eq!(PageRequest::new(1, 20)?.offset(), 0);
        assert_eq!(PageRequest::new(3, 20)?.offset(), 40);

        Ok(())
    }

    #[test]
    fn total_pages_rounds_up() -> TestResult {
        let page = Page::new(vec![1, 2], 21, PageRequest::new(1, 10)?);

        assert_eq!(page.total_pages(), 3);

        Ok(())
    }
}
