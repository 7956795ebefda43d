mod common;

use axum::{
    extract::FromRequestParts,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use common::TestApp;
use content_portal::{
    AppConfig, ApiError,
    auth::{AdminUser, AuthUser, Claims},
    models::Role,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;
use uuid::Uuid;

/// Runs the `AuthUser` extractor against a bare request carrying `auth_header`.
async fn extract_user(config: &AppConfig, auth_header: Option<&str>) -> Result<AuthUser, ApiError> {
    let mut builder = Request::builder().uri("/");
    if let Some(value) = auth_header {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let (mut parts, _) = builder.body(()).unwrap().into_parts();
    AuthUser::from_request_parts(&mut parts, config).await
}

fn sign(secret: &str, role: Role, exp_offset_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Uuid::new_v4(),
        role,
        iat: now as usize,
        exp: (now + exp_offset_secs) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

// --- Extractor ---

#[tokio::test]
async fn test_valid_token_resolves_identity() {
    let config = AppConfig::default();
    let token = sign(&config.jwt_secret, Role::User, 3600);

    let user = extract_user(&config, Some(&format!("Bearer {token}")))
        .await
        .unwrap();
    assert_eq!(user.role, Role::User);
    assert!(!user.is_admin());
}

#[tokio::test]
async fn test_missing_or_malformed_header_is_unauthorized() {
    let config = AppConfig::default();
    let token = sign(&config.jwt_secret, Role::User, 3600);

    for header_value in [None, Some("Bearer "), Some(token.as_str()), Some("Basic abc")] {
        let err = extract_user(&config, header_value).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED, "header {header_value:?}");
    }
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let config = AppConfig::default();
    let token = sign(&config.jwt_secret, Role::Admin, -60);

    let err = extract_user(&config, Some(&format!("Bearer {token}")))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.to_string(), "Invalid or expired token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let config = AppConfig::default();
    let token = sign("some-other-secret", Role::Admin, 3600);

    let err = extract_user(&config, Some(&format!("Bearer {token}")))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_extractor_forbids_regular_users() {
    let config = AppConfig::default();
    let user_token = sign(&config.jwt_secret, Role::User, 3600);
    let admin_token = sign(&config.jwt_secret, Role::Admin, 3600);

    let (mut parts, _) = Request::builder()
        .header(header::AUTHORIZATION, format!("Bearer {user_token}"))
        .body(())
        .unwrap()
        .into_parts();
    let err = AdminUser::from_request_parts(&mut parts, &config)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let (mut parts, _) = Request::builder()
        .header(header::AUTHORIZATION, format!("Bearer {admin_token}"))
        .body(())
        .unwrap()
        .into_parts();
    let AdminUser(admin) = AdminUser::from_request_parts(&mut parts, &config)
        .await
        .unwrap();
    assert!(admin.is_admin());
}

// --- Register / Login / Me ---

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({"name": "Ada", "email": "Ada@Example.com", "password": "secret1"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    assert_eq!(body["data"]["user"]["role"], "user");
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({"email": "ADA@example.com", "password": "secret1"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = TestApp::new();
    let payload = json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"});

    let (status, _) = app.post("/api/auth/register", None, payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post("/api/auth/register", None, payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_register_validates_input() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({"name": "Ada", "email": "ada@example.com", "password": "12345"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password must be at least 6 characters");

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({"name": "Ada", "email": "not-an-email", "password": "secret1"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide a valid email address");

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({"email": "ada@example.com", "password": "secret1"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name is required");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = TestApp::new();
    app.post(
        "/api/auth/register",
        None,
        json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"}),
    )
    .await;

    let (status, wrong_password) = app
        .post(
            "/api/auth/login",
            None,
            json!({"email": "ada@example.com", "password": "wrong-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = app
        .post(
            "/api/auth/login",
            None,
            json!({"email": "nobody@example.com", "password": "secret1"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["error"], unknown_email["error"]);
    assert_eq!(wrong_password["error"], "Invalid email or password");

    let (status, body) = app
        .post("/api/auth/login", None, json!({"email": "ada@example.com"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email and password are required");
}

#[tokio::test]
async fn test_me_requires_a_token() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = app.get("/api/auth/me", Some("not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_me_changes_name_and_password() {
    let app = TestApp::new();
    let (_, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"}),
        )
        .await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = app
        .put(
            "/api/auth/me",
            Some(&token),
            json!({"name": "Ada Lovelace", "password": "newsecret"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ada Lovelace");

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({"email": "ada@example.com", "password": "newsecret"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .put("/api/auth/me", Some(&token), json!({"password": "abc"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password must be at least 6 characters");
}
