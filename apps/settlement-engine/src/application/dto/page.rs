//! Pagination.

use serde::{Deserialize, Serialize};

/// Page size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSettings {
    /// Limit used when the caller gives none.
    pub default_limit: u32,
    /// Largest limit accepted.
    pub max_limit: u32,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// A normalized page request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
}

impl PageRequest {
    /// Clamp raw query values into a valid request.
    #[must_use]
    pub fn resolve(page: Option<u32>, limit: Option<u32>, settings: PageSettings) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(settings.default_limit)
                .clamp(1, settings.max_limit.max(1)),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::resolve(None, None, PageSettings::default())
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total matching items.
    pub total: usize,
    /// Page number.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Number of pages.
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Cut `page` out of the full, already-ordered result set.
    #[must_use]
    pub fn paginate(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let limit = request.limit as usize;
        let skip = (request.page as usize - 1).saturating_mul(limit);
        let total_pages = total.div_ceil(limit) as u32;

        Self {
            items: all.into_iter().skip(skip).take(limit).collect(),
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
        }
    }

    /// Transform the items.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}
