mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, request};
use serde_json::json;
use uuid::Uuid;

/// Every admin route with a syntactically valid path.
fn admin_routes() -> Vec<(Method, String)> {
    let id = Uuid::new_v4();
    let mut routes = vec![
        (Method::GET, "/api/admin/stats".to_string()),
        (Method::GET, "/api/admin/users".to_string()),
        (Method::POST, "/api/admin/users".to_string()),
        (Method::GET, format!("/api/admin/users/{id}")),
        (Method::PUT, format!("/api/admin/users/{id}")),
        (Method::DELETE, format!("/api/admin/users/{id}")),
        (Method::GET, format!("/api/admin/jobs/{id}/applications")),
        (Method::PUT, format!("/api/admin/applications/{id}/status")),
    ];
    for resource in ["news", "jobs", "vlogs", "ebooks"] {
        routes.push((Method::GET, format!("/api/admin/{resource}")));
        routes.push((Method::POST, format!("/api/admin/{resource}")));
        routes.push((Method::GET, format!("/api/admin/{resource}/{id}")));
        routes.push((Method::PUT, format!("/api/admin/{resource}/{id}")));
        routes.push((Method::DELETE, format!("/api/admin/{resource}/{id}")));
    }
    routes
}

fn body_for(method: &Method) -> Option<serde_json::Value> {
    matches!(*method, Method::POST | Method::PUT).then(|| json!({}))
}

#[tokio::test]
async fn test_admin_routes_reject_anonymous_callers() {
    let app = TestApp::new();

    for (method, uri) in admin_routes() {
        let body = body_for(&method);
        let (status, json) = app
            .send(request(method.clone(), &uri, None, body))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(json["success"], false, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_admin_routes_forbid_regular_users() {
    let app = TestApp::new();
    let token = app.user_token().await;

    for (method, uri) in admin_routes() {
        let body = body_for(&method);
        let (status, json) = app
            .send(request(method.clone(), &uri, Some(&token), body))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(json["error"], "Admin access required", "{method} {uri}");
    }
}

#[tokio::test]
async fn test_public_write_methods_require_admin() {
    let app = TestApp::new();
    let token = app.user_token().await;
    let article = app.seed_news("Existing", true).await;

    let (status, _) = app
        .post("/api/news", None, json!({"title": "t", "content": "c"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/api/news", Some(&token), json!({"title": "t", "content": "c"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete(&format!("/api/news/{}", article.id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.admin_token().await;
    let (status, body) = app
        .post("/api/news", Some(&admin), json!({"title": "t", "content": "c"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "News article created");
}

#[tokio::test]
async fn test_admin_can_read_dashboard_stats() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    app.seed_news("One", true).await;
    app.seed_news("Draft", false).await;
    app.seed_vlog("Clip", true).await;
    app.seed_ebook("Book", 0.0, true).await;

    let (status, body) = app.get("/api/admin/stats", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalUsers"], 1);
    assert_eq!(body["data"]["totalNews"], 2);
    assert_eq!(body["data"]["totalVlogs"], 1);
    assert_eq!(body["data"]["totalEbooks"], 1);
    assert_eq!(body["data"]["totalJobs"], 0);
    assert_eq!(body["data"]["totalApplications"], 0);
}
