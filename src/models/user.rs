use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Pagination;
use crate::normalize::{lenient_bool, lenient_enum};

/// Role
///
/// The RBAC flag carried in every token. Only `Admin` may reach `/api/admin/*`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, TS, ToSchema,
)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// User
///
/// The stored account record. Never serialized directly: the password hash must not
/// leave the server, so responses go through `UserProfile`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    // Stored lower-cased; unique across the collection.
    pub email: String,
    // Argon2id PHC string.
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// UserProfile
///
/// Public view of a user returned by auth and admin endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

// --- Request Payloads ---

/// RegisterRequest
///
/// Input payload for public sign-up (POST /api/auth/register). New accounts always get
/// the `user` role.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// AuthResponse
///
/// Issued token plus the profile it was issued for.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// UpdateProfileRequest
///
/// Self-service profile edit (PUT /api/auth/me). Role and verification are admin-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// CreateUserRequest
///
/// Admin account creation (POST /api/admin/users).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_verified: Option<bool>,
}

/// UpdateUserRequest
///
/// Admin partial edit (PUT /api/admin/users/{id}); absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_verified: Option<bool>,
}

/// Admin user listing criteria.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub pagination: Pagination,
}
