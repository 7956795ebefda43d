use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::ApiError,
    models::{Role, User},
};

/// Claims
///
/// Payload of the HS256 access token. The token is the whole session: nothing is looked
/// up server side, so a token stays valid until `exp` even if the account changes.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    pub role: Role,
    /// Issued at (seconds since the epoch).
    pub iat: usize,
    /// Expiry (seconds since the epoch).
    pub exp: usize,
}

/// issue_token
///
/// Signs a token for `user` that expires `config.token_ttl_secs` from now.
pub fn issue_token(config: &AppConfig, user: &User) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id,
        role: user.role,
        iat: now as usize,
        exp: (now + config.token_ttl_secs) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

/// decode_token
///
/// Verifies signature and expiry. Every failure (malformed, tampered, expired) is the
/// same 401 for the caller; only the log line differs.
pub fn decode_token(config: &AppConfig, token: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    // Expiry is exact; no grace period.
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        match e.kind() {
            ErrorKind::ExpiredSignature => tracing::debug!("rejected expired token"),
            other => tracing::debug!(reason = ?other, "rejected invalid token"),
        }
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })
}

/// AuthUser
///
/// Identity resolved from a valid bearer token. Taking it as a handler argument makes
/// the route authenticated.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Rejection: 401 with the error envelope when the header is missing, not a Bearer
/// token, or the token does not verify.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(ApiError::unauthorized)?;

        let claims = decode_token(&config, token)?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// AdminUser
///
/// An `AuthUser` whose token carries the admin role. Missing or bad token is 401, a
/// valid non-admin token is 403.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::debug!(user_id = %user.id, "non-admin token on admin route");
            return Err(ApiError::forbidden());
        }
        Ok(AdminUser(user))
    }
}

// --- Password hashing ---

/// Hashes a password with Argon2id and a fresh random salt. Returns the PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Checks `password` against a stored PHC string. A mismatch is `Ok(false)`; only an
/// unreadable stored hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ApiError::Internal(format!("stored password hash is invalid: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ApiError::Internal(format!("password verification failed: {e}"))),
    }
}
