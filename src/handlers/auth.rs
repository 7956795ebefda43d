use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use super::JsonBody;
use crate::{
    AppState,
    auth::{AuthUser, hash_password, issue_token, verify_password},
    error::{ApiError, ApiResult},
    models::{
        ApiResponse, AuthResponse, LoginRequest, RegisterRequest, Role, UpdateProfileRequest,
        User, UserProfile, required,
    },
    normalize::non_blank,
};

pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Lower-cases and checks the address shape. Uniqueness is the store's job.
pub(crate) fn normalize_email(raw: Option<String>) -> Result<String, ApiError> {
    let email = required(raw, "email")?.to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(ApiError::bad_request("Please provide a valid email address"));
    }
    Ok(email)
}

pub(crate) fn validate_password(raw: Option<String>) -> Result<String, ApiError> {
    let password = raw
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("password is required"))?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(password)
}

/// register
///
/// [Public Route] Creates a `user` account and signs the caller in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered; token and profile", body = AuthResponse),
        (status = 400, description = "Missing fields, short password or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let name = required(payload.name, "name")?;
    let email = normalize_email(payload.email)?;
    let password = validate_password(payload.password)?;

    if state.repo.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("User already exists"));
    }

    let now = Utc::now();
    let user = state
        .repo
        .create_user(User {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash: hash_password(&password)?,
            role: Role::User,
            is_verified: false,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user registered");
    let token = issue_token(&state.config, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            AuthResponse {
                token,
                user: user.into(),
            },
            "User registered successfully",
        )),
    ))
}

/// login
///
/// [Public Route] Exchanges credentials for a token. Unknown email and wrong password
/// produce the same 401 so accounts cannot be probed.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token and profile", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let (Some(email), Some(password)) = (
        non_blank(payload.email),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    let user = state
        .repo
        .find_user_by_email(&email.to_lowercase())
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = issue_token(&state.config, &user)?;
    Ok(Json(ApiResponse::with_message(
        AuthResponse {
            token,
            user: user.into(),
        },
        "Login successful",
    )))
}

/// me
///
/// [Authenticated Route] Profile of the token's owner.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let user = state
        .repo
        .get_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// update_me
///
/// [Authenticated Route] Changes the caller's display name and/or password.
#[utoipa::path(
    put,
    path = "/api/auth/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Password too short"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let mut user = state
        .repo
        .get_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    if let Some(name) = non_blank(payload.name) {
        user.name = name;
    }
    if payload.password.is_some() {
        user.password_hash = hash_password(&validate_password(payload.password)?)?;
    }
    user.updated_at = Utc::now();

    let user = state
        .repo
        .update_user(user)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(ApiResponse::with_message(user.into(), "Profile updated")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email(Some("  Ada@Example.COM ".into())).unwrap(),
            "ada@example.com"
        );
        assert!(normalize_email(Some("not-an-email".into())).is_err());
        assert!(normalize_email(None).is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(validate_password(Some("12345".into())).is_err());
        assert!(validate_password(Some("123456".into())).is_ok());
        assert!(validate_password(None).is_err());
    }
}
