//! Pagination utilities shared by list endpoints
//!
//! `Pagination` is the validated request side, `PageInfo` the metadata
//! returned next to a page of rows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be >= 1")]
    Page,
    #[error("limit must be between 1 and {MAX_LIMIT}")]
    Limit,
    #[error("page is out of range")]
    OutOfRange,
}

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub limit: u64,
}

impl Pagination {
    /// Build from optional query parameters, applying defaults and bounds.
    pub fn from_query(page: Option<u64>, limit: Option<u64>) -> Result<Self, PaginationError> {
        let p = Self { page: page.unwrap_or(DEFAULT_PAGE), limit: limit.unwrap_or(DEFAULT_LIMIT) };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> Result<(), PaginationError> {
        if self.page == 0 {
            return Err(PaginationError::Page);
        }
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(PaginationError::Limit);
        }
        // OFFSET is bound as a signed 64-bit value by the drivers.
        match (self.page - 1).checked_mul(self.limit) {
            Some(offset) if offset <= i64::MAX as u64 => Ok(()),
            _ => Err(PaginationError::OutOfRange),
        }
    }

    /// Row offset of the first item; saturates for values `validate` rejects.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PageInfo {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if total == 0 || limit == 0 { 0 } else { total.div_ceil(limit) };
        Self { page, limit, total, total_pages }
    }

    pub fn for_request(p: Pagination, total: u64) -> Self {
        Self::new(p.page, p.limit, total)
    }
}

/// One page of rows plus its metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), info: self.info }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_omitted() {
        let p = Pagination::from_query(None, None).unwrap();
        assert_eq!(p, Pagination { page: 1, limit: 20 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let p = Pagination::from_query(Some(5), Some(10)).unwrap();
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(Pagination::from_query(Some(0), None), Err(PaginationError::Page));
        assert_eq!(Pagination::from_query(None, Some(0)), Err(PaginationError::Limit));
        assert_eq!(Pagination::from_query(None, Some(101)), Err(PaginationError::Limit));
        assert!(Pagination::from_query(None, Some(100)).is_ok());
    }

    #[test]
    fn huge_page_is_rejected_instead_of_overflowing() {
        assert_eq!(Pagination::from_query(Some(u64::MAX), Some(100)), Err(PaginationError::OutOfRange));
        assert_eq!(Pagination::from_query(Some(u64::MAX), Some(1)), Err(PaginationError::OutOfRange));
        let p = Pagination { page: u64::MAX, limit: 100 };
        assert_eq!(p.offset(), u64::MAX);
    }

    #[test]
    fn total_pages_rounds_up_and_is_zero_when_empty() {
        assert_eq!(PageInfo::new(1, 20, 0).total_pages, 0);
        assert_eq!(PageInfo::new(1, 20, 1).total_pages, 1);
        assert_eq!(PageInfo::new(1, 20, 20).total_pages, 1);
        assert_eq!(PageInfo::new(1, 20, 21).total_pages, 2);
        assert_eq!(PageInfo::new(3, 7, 100).total_pages, 15);
    }
}
