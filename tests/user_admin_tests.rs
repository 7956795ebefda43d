mod common;

use axum::http::StatusCode;
use common::TestApp;
use content_portal::models::Role;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_admin_creates_accounts_with_roles() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/admin/users",
            Some(&token),
            json!({
                "name": "Grace",
                "email": "Grace@Example.com",
                "password": "hopper123",
                "role": "admin",
                "isVerified": "true"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created");
    assert_eq!(body["data"]["email"], "grace@example.com");
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["isVerified"], true);

    // The new admin can sign in and reach the back office.
    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({"email": "grace@example.com", "password": "hopper123"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let grace = body["data"]["token"].as_str().unwrap().to_string();
    let (status, _) = app.get("/api/admin/stats", Some(&grace)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let payload = json!({"name": "Dup", "email": "dup@example.com", "password": "secret1"});

    let (status, _) = app
        .post("/api/admin/users", Some(&token), payload.clone())
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post("/api/admin/users", Some(&token), payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_update_changes_role_and_rejects_taken_email() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let (member, _) = app.seed_user(Role::User).await;
    let (other, _) = app.seed_user(Role::User).await;
    let uri = format!("/api/admin/users/{}", member.id);

    let (status, body) = app
        .put(&uri, Some(&token), json!({"role": "admin", "name": "Promoted"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["name"], "Promoted");
    assert_eq!(body["data"]["email"], member.email);

    let (status, body) = app
        .put(&uri, Some(&token), json!({"email": other.email}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email is already in use");

    let (status, _) = app
        .put(
            &format!("/api/admin/users/{}", Uuid::new_v4()),
            Some(&token),
            json!({"name": "Nobody"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_cannot_delete_own_account() {
    let app = TestApp::new();
    let (admin, token) = app.seed_user(Role::Admin).await;
    let (member, _) = app.seed_user(Role::User).await;

    let (status, body) = app
        .delete(&format!("/api/admin/users/{}", admin.id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You cannot delete your own account");

    let (status, body) = app
        .delete(&format!("/api/admin/users/{}", member.id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted");

    let (status, _) = app
        .get(&format!("/api/admin/users/{}", member.id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users_search_and_role_filter() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    for (name, email) in [
        ("Alice Smith", "alice@example.com"),
        ("Bob Stone", "bob@example.com"),
        ("Carol Smithers", "carol@sample.org"),
    ] {
        app.post(
            "/api/admin/users",
            Some(&token),
            json!({"name": name, "email": email, "password": "secret1"}),
        )
        .await;
    }

    let (status, body) = app.get("/api/admin/users?search=smith", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    let (_, body) = app.get("/api/admin/users?search=sample.org", Some(&token)).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["name"], "Carol Smithers");

    let (_, body) = app.get("/api/admin/users?role=admin", Some(&token)).await;
    assert_eq!(body["total"], 1);

    let (_, body) = app.get("/api/admin/users?role=user&limit=2", Some(&token)).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["totalPages"], 2);
    assert!(body["data"][0].get("passwordHash").is_none());

    let (status, _) = app.get("/api/admin/users?role=owner", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
