//! Offset pagination primitives shared by both repositories

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::PaginationConfig;

/// Raw `?page=&pageSize=` query values
///
/// Values are kept as strings so that junk input falls back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (1-based)
    pub page: Option<String>,
    /// Items per page
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

impl PageQuery {
    pub fn to_request(&self, config: &PaginationConfig) -> PageRequest {
        PageRequest::new(
            self.page.as_deref().and_then(|v| v.trim().parse().ok()),
            self.page_size.as_deref().and_then(|v| v.trim().parse().ok()),
            config,
        )
    }
}

/// Normalised page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, page_size: Option<i64>, config: &PaginationConfig) -> Self {
        let page = page.unwrap_or(1).max(1);
        let page_size = match page_size {
            Some(size) if size >= 1 => size.min(config.max_page_size),
            _ => config.default_page_size,
        };
        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// One page of query results plus total-count metadata
#[derive(Debug, Clone)]
pub struct PaginatedData<T> {
    data: Vec<T>,
    page: i64,
    page_size: i64,
    total: i64,
}

impl<T> PaginatedData<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            data,
            page: request.page,
            page_size: request.page_size,
            total,
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Convert the page contents, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedData<U> {
        PaginatedData {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
        }
    }

    pub fn metadata(&self) -> PaginationMeta {
        PaginationMeta {
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
}

impl PaginationMeta {
    pub fn pages(&self) -> i64 {
        if self.page_size <= 0 {
            return 0;
        }
        (self.total + self.page_size - 1) / self.page_size
    }
}

/// Pagination links for the admin templates
#[derive(Debug, Clone, Serialize)]
pub struct PaginationView {
    pub total: i64,
    pub page: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
    pub pages: i64,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
}

impl From<PaginationMeta> for PaginationView {
    fn from(meta: PaginationMeta) -> Self {
        let pages = meta.pages();
        Self {
            total: meta.total,
            page: meta.page,
            page_size: meta.page_size,
            pages,
            prev_page: (meta.page > 1).then(|| (meta.page - 1).min(pages.max(1))),
            next_page: (meta.page < pages).then_some(meta.page + 1),
        }
    }
}
