use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use super::{IdPath, JsonBody, ListParams, QueryParams};
use crate::{
    AppState,
    auth::AdminUser,
    error::{ApiError, ApiResult},
    models::{ApiResponse, NewsArticle, NewsCategory, NewsInput, Paginated},
};

/// list_news
///
/// [Public Route] Published articles only, whatever `published` says.
#[utoipa::path(
    get,
    path = "/api/news",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated published articles", body = [NewsArticle]),
        (status = 400, description = "Invalid query parameter")
    )
)]
pub async fn list_news(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Paginated<NewsArticle>>> {
    let mut filter = params.content_filter::<NewsCategory>(None)?;
    filter.visible = Some(true);
    let page = state.repo.list_news(&filter).await?;
    Ok(Json(Paginated::new(page, filter.pagination)))
}

/// get_news
///
/// [Public Route] Returns a published article and counts the view.
#[utoipa::path(
    get,
    path = "/api/news/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article, views already incremented", body = NewsArticle),
        (status = 404, description = "Missing or unpublished")
    )
)]
pub async fn get_news(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<NewsArticle>>> {
    let visible = state
        .repo
        .get_news(id)
        .await?
        .is_some_and(|article| article.published);
    if !visible {
        return Err(ApiError::not_found("News article"));
    }

    let article = state
        .repo
        .increment_news_views(id)
        .await?
        .ok_or_else(|| ApiError::not_found("News article"))?;
    Ok(Json(ApiResponse::ok(article)))
}

/// admin_list_news
///
/// [Admin Route] Every article, optionally filtered on `published`.
#[utoipa::path(
    get,
    path = "/api/admin/news",
    params(ListParams),
    responses((status = 200, description = "Paginated articles", body = [NewsArticle]))
)]
pub async fn admin_list_news(
    _admin: AdminUser,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Paginated<NewsArticle>>> {
    let filter = params.content_filter::<NewsCategory>(params.published.as_deref())?;
    let page = state.repo.list_news(&filter).await?;
    Ok(Json(Paginated::new(page, filter.pagination)))
}

/// admin_get_news
///
/// [Admin Route] Any article, drafts included. Does not count as a view.
#[utoipa::path(
    get,
    path = "/api/admin/news/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article", body = NewsArticle),
        (status = 404, description = "Not found")
    )
)]
pub async fn admin_get_news(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<NewsArticle>>> {
    let article = state
        .repo
        .get_news(id)
        .await?
        .ok_or_else(|| ApiError::not_found("News article"))?;
    Ok(Json(ApiResponse::ok(article)))
}

/// create_news
///
/// [Admin Route] The caller becomes the author.
#[utoipa::path(
    post,
    path = "/api/admin/news",
    request_body = NewsInput,
    responses(
        (status = 201, description = "Created", body = NewsArticle),
        (status = 400, description = "Missing title or content"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn create_news(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewsInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<NewsArticle>>)> {
    let article = input.into_article(admin.id, Utc::now())?;
    let article = state.repo.create_news(article).await?;
    tracing::info!(news_id = %article.id, "news article created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(article, "News article created")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/news/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = NewsInput,
    responses(
        (status = 200, description = "Updated", body = NewsArticle),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_news(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<NewsInput>,
) -> ApiResult<Json<ApiResponse<NewsArticle>>> {
    let mut article = state
        .repo
        .get_news(id)
        .await?
        .ok_or_else(|| ApiError::not_found("News article"))?;
    input.apply_to(&mut article, Utc::now());

    let article = state
        .repo
        .update_news(article)
        .await?
        .ok_or_else(|| ApiError::not_found("News article"))?;
    Ok(Json(ApiResponse::with_message(article, "News article updated")))
}

#[utoipa::path(
    delete,
    path = "/api/admin/news/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_news(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<Uuid>>> {
    if !state.repo.delete_news(id).await? {
        return Err(ApiError::not_found("News article"));
    }
    tracing::info!(news_id = %id, "news article deleted");
    Ok(Json(ApiResponse::with_message(id, "News article deleted")))
}
