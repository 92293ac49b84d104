// src/pagination.rs
//! Page cursor parsing and pagination metadata for list endpoints.

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// A 1-indexed (page, limit) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Parses a positive integer, falling back when the input is absent,
/// non-numeric, or below 1.
fn positive_or(raw: Option<&str>, fallback: i64) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value >= 1)
        .unwrap_or(fallback)
}

impl PageCursor {
    /// Builds a cursor from raw query-string values. Never fails.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, cursor: PageCursor) -> Self {
        Self {
            total,
            page: cursor.page,
            limit: cursor.limit,
            pages: total_pages(total, cursor.limit),
        }
    }
}

/// ceil(total / limit); zero rows means zero pages.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
