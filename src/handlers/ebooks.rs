use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use super::{IdPath, JsonBody, ListParams, QueryParams};
use crate::{
    AppState,
    auth::AdminUser,
    error::{ApiError, ApiResult},
    models::{ApiResponse, EBook, EBookCategory, EBookInput, Paginated},
};

/// list_ebooks
///
/// [Public Route] Available books only. Supports `sort=price-asc|price-desc`.
#[utoipa::path(
    get,
    path = "/api/ebooks",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated available e-books", body = [EBook]),
        (status = 400, description = "Invalid query parameter")
    )
)]
pub async fn list_ebooks(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Paginated<EBook>>> {
    let mut filter = params.content_filter::<EBookCategory>(None)?;
    filter.visible = Some(true);
    let page = state.repo.list_ebooks(&filter).await?;
    Ok(Json(Paginated::new(page, filter.pagination)))
}

/// get_ebook
///
/// [Public Route] Returns an available book, including its `fileUrl`, and counts the
/// download.
#[utoipa::path(
    get,
    path = "/api/ebooks/{id}",
    params(("id" = Uuid, Path, description = "E-book ID")),
    responses(
        (status = 200, description = "E-book, downloads already incremented", body = EBook),
        (status = 404, description = "Missing or unavailable")
    )
)]
pub async fn get_ebook(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<EBook>>> {
    let available = state
        .repo
        .get_ebook(id)
        .await?
        .is_some_and(|ebook| ebook.available);
    if !available {
        return Err(ApiError::not_found("E-book"));
    }

    let ebook = state
        .repo
        .increment_ebook_downloads(id)
        .await?
        .ok_or_else(|| ApiError::not_found("E-book"))?;
    Ok(Json(ApiResponse::ok(ebook)))
}

#[utoipa::path(
    get,
    path = "/api/admin/ebooks",
    params(ListParams),
    responses((status = 200, description = "Paginated e-books", body = [EBook]))
)]
pub async fn admin_list_ebooks(
    _admin: AdminUser,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Paginated<EBook>>> {
    let filter = params.content_filter::<EBookCategory>(params.available.as_deref())?;
    let page = state.repo.list_ebooks(&filter).await?;
    Ok(Json(Paginated::new(page, filter.pagination)))
}

#[utoipa::path(
    get,
    path = "/api/admin/ebooks/{id}",
    params(("id" = Uuid, Path, description = "E-book ID")),
    responses(
        (status = 200, description = "E-book", body = EBook),
        (status = 404, description = "Not found")
    )
)]
pub async fn admin_get_ebook(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<EBook>>> {
    let ebook = state
        .repo
        .get_ebook(id)
        .await?
        .ok_or_else(|| ApiError::not_found("E-book"))?;
    Ok(Json(ApiResponse::ok(ebook)))
}

#[utoipa::path(
    post,
    path = "/api/admin/ebooks",
    request_body = EBookInput,
    responses(
        (status = 201, description = "Created", body = EBook),
        (status = 400, description = "Missing required field or negative price")
    )
)]
pub async fn create_ebook(
    _admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<EBookInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<EBook>>)> {
    let ebook = input.into_ebook(Utc::now())?;
    let ebook = state.repo.create_ebook(ebook).await?;
    tracing::info!(ebook_id = %ebook.id, "e-book created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(ebook, "E-book created")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/ebooks/{id}",
    params(("id" = Uuid, Path, description = "E-book ID")),
    request_body = EBookInput,
    responses(
        (status = 200, description = "Updated", body = EBook),
        (status = 400, description = "Negative price"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_ebook(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<EBookInput>,
) -> ApiResult<Json<ApiResponse<EBook>>> {
    let mut ebook = state
        .repo
        .get_ebook(id)
        .await?
        .ok_or_else(|| ApiError::not_found("E-book"))?;
    input.apply_to(&mut ebook, Utc::now())?;

    let ebook = state
        .repo
        .update_ebook(ebook)
        .await?
        .ok_or_else(|| ApiError::not_found("E-book"))?;
    Ok(Json(ApiResponse::with_message(ebook, "E-book updated")))
}

#[utoipa::path(
    delete,
    path = "/api/admin/ebooks/{id}",
    params(("id" = Uuid, Path, description = "E-book ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_ebook(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<Uuid>>> {
    if !state.repo.delete_ebook(id).await? {
        return Err(ApiError::not_found("E-book"));
    }
    tracing::info!(ebook_id = %id, "e-book deleted");
    Ok(Json(ApiResponse::with_message(id, "E-book deleted")))
}
