//! Pagination envelope and sort direction

use serde::{Deserialize, Serialize};

/// Default page size when `limit` is omitted
pub const DEFAULT_LIMIT: u32 = 10;
/// Upper bound for `limit`
pub const MAX_LIMIT: u32 = 100;

/// Paginated list response: `{ total, currentPage, totalPages, data }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub total: i64,
    pub current_page: u32,
    pub total_pages: u32,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            ((total.max(0) as f64) / (limit as f64)).ceil() as u32
        } else {
            1
        };

        Self {
            total,
            current_page: page,
            total_pages,
            data,
        }
    }
}

/// Resolve `page`/`limit` query values into `(page, limit, offset)`
pub fn page_window(page: Option<u32>, limit: Option<u32>) -> (u32, u32, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = (page as i64 - 1) * limit as i64;
    (page, limit, offset)
}

/// Sort direction (`asc` / `desc`)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_total_pages() {
        let resp = Paginated::new(vec![1, 2, 3], 21, 1, 10);
        assert_eq!(resp.total_pages, 3);
        assert_eq!(resp.current_page, 1);

        let empty: Paginated<i32> = Paginated::new(vec![], 0, 1, 10);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_paginated_serializes_camel_case() {
        let json = serde_json::to_value(Paginated::new(vec![1], 1, 1, 10)).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["total"], 1);
    }

    #[test]
    fn test_page_window_defaults_and_clamps() {
        assert_eq!(page_window(None, None), (1, 10, 0));
        assert_eq!(page_window(Some(3), Some(20)), (3, 20, 40));
        assert_eq!(page_window(Some(0), Some(1000)), (1, MAX_LIMIT, 0));
    }
}
