use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{error::ApiError, normalize::non_blank};

pub mod application;
pub mod ebook;
pub mod job;
pub mod news;
pub mod user;
pub mod vlog;

pub use application::{
    ApplicationStatus, ApplyRequest, JobApplication, UpdateApplicationStatusRequest,
};
pub use ebook::{EBook, EBookCategory, EBookInput};
pub use job::{JobCategory, JobInput, JobPosting, JobType};
pub use news::{NewsArticle, NewsCategory, NewsInput};
pub use user::{
    AuthResponse, CreateUserRequest, LoginRequest, RegisterRequest, Role, UpdateProfileRequest,
    UpdateUserRequest, User, UserFilter, UserProfile,
};
pub use vlog::{Vlog, VlogCategory, VlogInput};

// --- Listing & Pagination ---

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination
///
/// A normalized page request: `page` is 1-based and `limit` is clamped to `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1),
            limit: limit
                .filter(|l| *l > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
        }
    }

    /// Number of records to skip before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

/// One page of records plus the size of the whole filtered set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// SortOrder
///
/// Accepted values of the `sort` query parameter. `Popular` ranks by views (downloads for
/// e-books); the price orders only apply to e-books and fall back to `Newest` elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Popular,
    Title,
    PriceAsc,
    PriceDesc,
}

/// ContentFilter
///
/// Listing criteria shared by the four content types. `visible` means published for news
/// and vlogs, open (active and before the deadline) for jobs, and available for e-books.
#[derive(Debug, Clone)]
pub struct ContentFilter<C> {
    pub category: Option<C>,
    pub search: Option<String>,
    pub visible: Option<bool>,
    pub featured: Option<bool>,
    pub sort: SortOrder,
    pub pagination: Pagination,
}

impl<C> Default for ContentFilter<C> {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            visible: None,
            featured: None,
            sort: SortOrder::default(),
            pagination: Pagination::default(),
        }
    }
}

// --- Response Envelopes ---

/// ApiResponse
///
/// The uniform success envelope: `{ success: true, data, message? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Paginated
///
/// The list envelope: `{ success, data, total, page, limit, totalPages }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(page: Page<T>, pagination: Pagination) -> Self {
        Self {
            success: true,
            total_pages: pagination.total_pages(page.total),
            data: page.items,
            total: page.total,
            page: pagination.page,
            limit: pagination.limit,
        }
    }
}

// --- Dashboard & Upload Schemas ---

/// DashboardStats
///
/// Output schema for the administrative statistics dashboard (GET /api/admin/stats).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    #[ts(type = "number")]
    pub total_users: i64,
    #[ts(type = "number")]
    pub total_news: i64,
    #[ts(type = "number")]
    pub total_jobs: i64,
    /// Jobs that are active and whose deadline has not passed.
    #[ts(type = "number")]
    pub open_jobs: i64,
    #[ts(type = "number")]
    pub total_vlogs: i64,
    #[ts(type = "number")]
    pub total_ebooks: i64,
    #[ts(type = "number")]
    pub total_applications: i64,
}

/// UploadResponse
///
/// Returned by the multipart upload endpoint once the object is stored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UploadResponse {
    /// Publicly reachable URL of the stored object.
    pub url: String,
    /// Object key inside the bucket.
    pub key: String,
    #[ts(type = "number")]
    pub size: u64,
    pub content_type: String,
}

// --- Input Helpers ---

/// Returns the trimmed value of a required text field, or a 400 naming the field.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    non_blank(value).ok_or_else(|| ApiError::bad_request(format!("{field} is required")))
}

/// Replaces `target` with the trimmed value when a non-blank one was submitted.
pub(crate) fn merge_text(target: &mut String, value: Option<String>) {
    if let Some(v) = non_blank(value) {
        *target = v;
    }
}

/// Optional text fields: a submitted blank clears the value, an absent field keeps it.
pub(crate) fn merge_optional(target: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value {
        *target = non_blank(Some(v));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_clamping() {
        assert_eq!(Pagination::new(None, None), Pagination { page: 1, limit: 10 });
        assert_eq!(Pagination::new(Some(0), Some(0)), Pagination { page: 1, limit: 10 });
        assert_eq!(Pagination::new(Some(3), Some(500)).limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_and_total_pages() {
        let p = Pagination::new(Some(2), Some(10));
        assert_eq!(p.offset(), 10);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(25), 3);
    }

    #[test]
    fn test_paginated_envelope_uses_camel_case() {
        let page = Page {
            items: vec![1, 2],
            total: 12,
        };
        let body = serde_json::to_value(Paginated::new(page, Pagination::new(Some(2), Some(10))))
            .unwrap();
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["page"], 2);
        assert_eq!(body["success"], true);
    }
}
