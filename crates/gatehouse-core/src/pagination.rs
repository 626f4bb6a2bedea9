//! Pagination utilities for listing endpoints.
//!
//! Listings are page-based:
//! - `perPage`: items per page (default: 10)
//! - `pageNumber`: 1-indexed page number (default: 1)
//! - `all`: `true` includes inactive rows
//! - `q`: substring filter
//!
//! Query values are parsed leniently: anything missing, unparsable, or out of
//! range falls back to the default instead of rejecting the request.
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_core::pagination::{PageQuery, PageResult};
//!
//! async fn list(Query(query): Query<PageQuery>) -> Result<Json<..>, AppError> {
//!     let page = query.to_page_request();
//!     let (items, total) = fetch(&page).await?;
//!     let result = PageResult::new(items, total, page.limit);
//!     // result.total_pages == ceil(total / limit)
//! }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const DEFAULT_PAGE_NUMBER: i64 = 1;

/// Raw listing query parameters, as sent by the client.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Items per page (positive integer, default 10)
    pub per_page: Option<String>,
    /// 1-indexed page number (default 1)
    pub page_number: Option<String>,
    /// `true` to include inactive users
    pub all: Option<String>,
    /// Case-insensitive substring filter
    pub q: Option<String>,
}

fn parse_positive(value: Option<&str>) -> Option<i64> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
}

impl PageQuery {
    pub fn per_page(&self) -> i64 {
        parse_positive(self.per_page.as_deref()).unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn page_number(&self) -> i64 {
        parse_positive(self.page_number.as_deref()).unwrap_or(DEFAULT_PAGE_NUMBER)
    }

    pub fn include_inactive(&self) -> bool {
        self.all.as_deref() == Some("true")
    }

    pub fn filter(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }

    pub fn to_page_request(&self) -> PageRequest {
        let limit = self.per_page();
        let offset = (self.page_number() - 1).saturating_mul(limit);
        PageRequest::new(limit, offset, self.filter(), self.include_inactive())
    }
}

/// A validated page request. `limit` is always positive and `offset` never
/// negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
    pub filter: String,
    pub include_inactive: bool,
}

impl PageRequest {
    pub fn new(limit: i64, offset: i64, filter: &str, include_inactive: bool) -> Self {
        Self {
            limit: if limit < 1 { DEFAULT_PER_PAGE } else { limit },
            offset: offset.max(0),
            filter: filter.to_string(),
            include_inactive,
        }
    }
}

/// One page of results plus the totals needed to render a pager.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub total_pages: i64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total_count: i64, limit: i64) -> Self {
        Self {
            items,
            total_count,
            total_pages: total_pages(total_count, limit),
        }
    }
}

/// `ceil(total / limit)`, zero when there is nothing to page through.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
