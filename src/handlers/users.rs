use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use super::{IdPath, JsonBody, ListParams, QueryParams, parse_choice};
use crate::{
    AppState,
    auth::{AdminUser, hash_password},
    error::{ApiError, ApiResult},
    handlers::auth::{normalize_email, validate_password},
    models::{
        ApiResponse, CreateUserRequest, Page, Paginated, Role, UpdateUserRequest, User,
        UserFilter, UserProfile, required,
    },
    normalize::non_blank,
};

/// list_users
///
/// [Admin Route] Paginated accounts; `search` matches name or email, `role` filters.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated user profiles", body = [UserProfile]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Paginated<UserProfile>>> {
    let filter = UserFilter {
        search: params.search(),
        role: parse_choice::<Role>(params.role.as_deref(), "role")?,
        pagination: params.pagination()?,
    };
    let page = state.repo.list_users(&filter).await?;
    let page = Page {
        items: page.items.into_iter().map(UserProfile::from).collect(),
        total: page.total,
    };
    Ok(Json(Paginated::new(page, filter.pagination)))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let user = state
        .repo
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// create_user
///
/// [Admin Route] Unlike public registration, the role and verification flag can be set.
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = UserProfile),
        (status = 400, description = "Missing field, short password or duplicate email")
    )
)]
pub async fn create_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserProfile>>)> {
    let name = required(payload.name, "name")?;
    let email = normalize_email(payload.email)?;
    let password = validate_password(payload.password)?;

    let now = Utc::now();
    let user = state
        .repo
        .create_user(User {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash: hash_password(&password)?,
            role: payload.role.unwrap_or_default(),
            is_verified: payload.is_verified.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(user_id = %user.id, role = ?user.role, "user created by admin");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(user.into(), "User created")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserProfile),
        (status = 400, description = "Invalid email, short password or email in use"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let mut user = state
        .repo
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    if let Some(name) = non_blank(payload.name) {
        user.name = name;
    }
    if non_blank(payload.email.clone()).is_some() {
        user.email = normalize_email(payload.email)?;
    }
    if payload.password.as_deref().is_some_and(|p| !p.is_empty()) {
        user.password_hash = hash_password(&validate_password(payload.password)?)?;
    }
    if let Some(role) = payload.role {
        user.role = role;
    }
    if let Some(is_verified) = payload.is_verified {
        user.is_verified = is_verified;
    }
    user.updated_at = Utc::now();

    let user = state
        .repo
        .update_user(user)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(ApiResponse::with_message(user.into(), "User updated")))
}

/// delete_user
///
/// [Admin Route] Removes an account and its job applications. An admin cannot delete
/// the account they are signed in with.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Attempt to delete own account"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<Uuid>>> {
    if admin.id == id {
        return Err(ApiError::bad_request("You cannot delete your own account"));
    }
    if !state.repo.delete_user(id).await? {
        return Err(ApiError::not_found("User"));
    }
    tracing::info!(user_id = %id, "user deleted");
    Ok(Json(ApiResponse::with_message(id, "User deleted")))
}
