//! HTTP handlers, one module per resource.
//!
//! Handlers stay thin: parse the request, call the repository, wrap the result in the
//! response envelope. Authorization comes from the `AuthUser` / `AdminUser` extractors.

use axum::extract::{FromRequest, FromRequestParts, Path, Query};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{ContentFilter, Pagination, SortOrder},
    normalize::{non_blank, parse_bool, parse_enum, parse_number},
};

pub mod applications;
pub mod auth;
pub mod ebooks;
pub mod jobs;
pub mod news;
pub mod stats;
pub mod upload;
pub mod users;
pub mod vlogs;

// --- Extractors ---
// Same as axum's `Json`, `Query` and `Path`, but rejections become `ApiError` so a
// malformed request still gets the `{ success: false, error }` envelope.

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

#[derive(Deserialize, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct IdPath(pub Uuid);

// --- Listing parameters ---

/// ListParams
///
/// Query string accepted by every list endpoint. Values arrive as raw strings and are
/// coerced here so `?published=1` and `?published=true` mean the same thing.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number (default 1).
    pub page: Option<String>,
    /// Page size (default 10, max 100).
    pub limit: Option<String>,
    /// Category wire name, e.g. `technology`. `all` means no filter.
    pub category: Option<String>,
    /// Case-insensitive substring search.
    pub search: Option<String>,
    /// News and vlogs: published flag (admin listing only).
    pub published: Option<String>,
    /// Jobs: open flag (admin listing only).
    pub active: Option<String>,
    /// E-books: availability flag (admin listing only).
    pub available: Option<String>,
    pub featured: Option<String>,
    /// `newest` (default), `oldest`, `popular`, `title`, `price-asc`, `price-desc`.
    pub sort: Option<String>,
    /// Users only: `user` or `admin`.
    pub role: Option<String>,
}

impl ListParams {
    pub fn pagination(&self) -> Result<Pagination, ApiError> {
        Ok(Pagination::new(
            parse_count(self.page.as_deref(), "page")?,
            parse_count(self.limit.as_deref(), "limit")?,
        ))
    }

    pub fn search(&self) -> Option<String> {
        non_blank(self.search.clone())
    }

    /// Builds the repository filter. `flag` is the raw value of the type's visibility
    /// parameter; public endpoints ignore it and pass `Some(true)` afterwards.
    pub fn content_filter<C>(&self, flag: Option<&str>) -> Result<ContentFilter<C>, ApiError>
    where
        C: serde::de::DeserializeOwned,
    {
        Ok(ContentFilter {
            category: parse_choice(self.category.as_deref(), "category")?,
            search: self.search(),
            visible: parse_flag(flag)?,
            featured: parse_flag(self.featured.as_deref())?,
            sort: parse_choice::<SortOrder>(self.sort.as_deref(), "sort")?.unwrap_or_default(),
            pagination: self.pagination()?,
        })
    }
}

fn parse_flag(raw: Option<&str>) -> Result<Option<bool>, ApiError> {
    match raw {
        None => Ok(None),
        Some(raw) => parse_bool(raw).map_err(ApiError::bad_request),
    }
}

fn parse_count(raw: Option<&str>, name: &str) -> Result<Option<u32>, ApiError> {
    let Some(n) = raw.map(parse_number).transpose().map_err(ApiError::bad_request)?.flatten()
    else {
        return Ok(None);
    };
    if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return Err(ApiError::bad_request(format!("{name} must be a positive integer")));
    }
    Ok(Some(n as u32))
}

/// Blank and `all` mean "no filter"; anything else must be a known wire name.
pub(crate) fn parse_choice<T>(raw: Option<&str>, name: &str) -> Result<Option<T>, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => parse_enum(value)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("Invalid {name} '{value}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsCategory;

    #[test]
    fn test_list_params_coercion() {
        let params = ListParams {
            page: Some("2".into()),
            limit: Some("25".into()),
            category: Some("technology".into()),
            featured: Some("1".into()),
            sort: Some("popular".into()),
            ..Default::default()
        };
        let filter = params
            .content_filter::<NewsCategory>(Some("yes"))
            .unwrap();
        assert_eq!(filter.category, Some(NewsCategory::Technology));
        assert_eq!(filter.visible, Some(true));
        assert_eq!(filter.featured, Some(true));
        assert_eq!(filter.sort, SortOrder::Popular);
        assert_eq!(filter.pagination, Pagination { page: 2, limit: 25 });
    }

    #[test]
    fn test_list_params_rejects_garbage() {
        let bad_page = ListParams {
            page: Some("two".into()),
            ..Default::default()
        };
        assert!(bad_page.pagination().is_err());

        let bad_category = ListParams {
            category: Some("astrology".into()),
            ..Default::default()
        };
        assert!(bad_category.content_filter::<NewsCategory>(None).is_err());

        let all = ListParams {
            category: Some("all".into()),
            ..Default::default()
        };
        assert!(all
            .content_filter::<NewsCategory>(None)
            .unwrap()
            .category
            .is_none());
    }
}
