use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use super::{IdPath, JsonBody, ListParams, QueryParams};
use crate::{
    AppState,
    auth::{AdminUser, AuthUser},
    error::{ApiError, ApiResult},
    models::{ApiResponse, Paginated, Vlog, VlogCategory, VlogInput},
};

/// list_vlogs
///
/// [Public Route] Published vlogs only.
#[utoipa::path(
    get,
    path = "/api/vlogs",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated published vlogs", body = [Vlog]),
        (status = 400, description = "Invalid query parameter")
    )
)]
pub async fn list_vlogs(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Paginated<Vlog>>> {
    let mut filter = params.content_filter::<VlogCategory>(None)?;
    filter.visible = Some(true);
    let page = state.repo.list_vlogs(&filter).await?;
    Ok(Json(Paginated::new(page, filter.pagination)))
}

/// get_vlog
///
/// [Public Route] Returns a published vlog and counts the view.
#[utoipa::path(
    get,
    path = "/api/vlogs/{id}",
    params(("id" = Uuid, Path, description = "Vlog ID")),
    responses(
        (status = 200, description = "Vlog, views already incremented", body = Vlog),
        (status = 404, description = "Missing or unpublished")
    )
)]
pub async fn get_vlog(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<Vlog>>> {
    let visible = state
        .repo
        .get_vlog(id)
        .await?
        .is_some_and(|vlog| vlog.published);
    if !visible {
        return Err(ApiError::not_found("Vlog"));
    }

    let vlog = state
        .repo
        .increment_vlog_views(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Vlog"))?;
    Ok(Json(ApiResponse::ok(vlog)))
}

/// like_vlog
///
/// [Authenticated Route] Adds one like. Likes are a plain counter; repeated likes from
/// the same user are not deduplicated.
#[utoipa::path(
    post,
    path = "/api/vlogs/{id}/like",
    params(("id" = Uuid, Path, description = "Vlog ID")),
    responses(
        (status = 200, description = "Vlog with the new like count", body = Vlog),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Missing or unpublished")
    )
)]
pub async fn like_vlog(
    _auth: AuthUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<Vlog>>> {
    let visible = state
        .repo
        .get_vlog(id)
        .await?
        .is_some_and(|vlog| vlog.published);
    if !visible {
        return Err(ApiError::not_found("Vlog"));
    }

    let vlog = state
        .repo
        .increment_vlog_likes(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Vlog"))?;
    Ok(Json(ApiResponse::ok(vlog)))
}

#[utoipa::path(
    get,
    path = "/api/admin/vlogs",
    params(ListParams),
    responses((status = 200, description = "Paginated vlogs", body = [Vlog]))
)]
pub async fn admin_list_vlogs(
    _admin: AdminUser,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Paginated<Vlog>>> {
    let filter = params.content_filter::<VlogCategory>(params.published.as_deref())?;
    let page = state.repo.list_vlogs(&filter).await?;
    Ok(Json(Paginated::new(page, filter.pagination)))
}

#[utoipa::path(
    get,
    path = "/api/admin/vlogs/{id}",
    params(("id" = Uuid, Path, description = "Vlog ID")),
    responses(
        (status = 200, description = "Vlog", body = Vlog),
        (status = 404, description = "Not found")
    )
)]
pub async fn admin_get_vlog(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<Vlog>>> {
    let vlog = state
        .repo
        .get_vlog(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Vlog"))?;
    Ok(Json(ApiResponse::ok(vlog)))
}

#[utoipa::path(
    post,
    path = "/api/admin/vlogs",
    request_body = VlogInput,
    responses(
        (status = 201, description = "Created", body = Vlog),
        (status = 400, description = "Missing title, description or videoUrl")
    )
)]
pub async fn create_vlog(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<VlogInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vlog>>)> {
    let vlog = input.into_vlog(admin.id, Utc::now())?;
    let vlog = state.repo.create_vlog(vlog).await?;
    tracing::info!(vlog_id = %vlog.id, "vlog created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(vlog, "Vlog created")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/vlogs/{id}",
    params(("id" = Uuid, Path, description = "Vlog ID")),
    request_body = VlogInput,
    responses(
        (status = 200, description = "Updated", body = Vlog),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_vlog(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<VlogInput>,
) -> ApiResult<Json<ApiResponse<Vlog>>> {
    let mut vlog = state
        .repo
        .get_vlog(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Vlog"))?;
    input.apply_to(&mut vlog, Utc::now());

    let vlog = state
        .repo
        .update_vlog(vlog)
        .await?
        .ok_or_else(|| ApiError::not_found("Vlog"))?;
    Ok(Json(ApiResponse::with_message(vlog, "Vlog updated")))
}

#[utoipa::path(
    delete,
    path = "/api/admin/vlogs/{id}",
    params(("id" = Uuid, Path, description = "Vlog ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_vlog(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<Uuid>>> {
    if !state.repo.delete_vlog(id).await? {
        return Err(ApiError::not_found("Vlog"));
    }
    tracing::info!(vlog_id = %id, "vlog deleted");
    Ok(Json(ApiResponse::with_message(id, "Vlog deleted")))
}
