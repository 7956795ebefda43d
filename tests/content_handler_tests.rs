mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

// --- Counters ---

#[tokio::test]
async fn test_public_detail_counts_views_once_per_fetch() {
    let app = TestApp::new();
    let article = app.seed_news("Counted", true).await;
    let uri = format!("/api/news/{}", article.id);

    let (status, first) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["views"], 1);

    let (_, second) = app.get(&uri, None).await;
    assert_eq!(second["data"]["views"], 2);
}

#[tokio::test]
async fn test_admin_detail_does_not_count_views() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let vlog = app.seed_vlog("Quiet", true).await;

    let (status, body) = app
        .get(&format!("/api/admin/vlogs/{}", vlog.id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["views"], 0);

    let (_, body) = app.get(&format!("/api/vlogs/{}", vlog.id), None).await;
    assert_eq!(body["data"]["views"], 1);
}

#[tokio::test]
async fn test_ebook_detail_counts_downloads() {
    let app = TestApp::new();
    let ebook = app.seed_ebook("Rust in Action", 9.99, true).await;
    let uri = format!("/api/ebooks/{}", ebook.id);

    app.get(&uri, None).await;
    let (status, body) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["downloads"], 2);
    assert_eq!(body["data"]["price"], 9.99);
}

#[tokio::test]
async fn test_vlog_likes_need_a_signed_in_user() {
    let app = TestApp::new();
    let token = app.user_token().await;
    let vlog = app.seed_vlog("Likeable", true).await;
    let uri = format!("/api/vlogs/{}/like", vlog.id);

    let (status, _) = app.post(&uri, None, json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.post(&uri, Some(&token), json!({})).await;
    let (status, body) = app.post(&uri, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["likes"], 2);
}

// --- Listing ---

#[tokio::test]
async fn test_list_pagination_envelope() {
    let app = TestApp::new();
    for i in 0..25 {
        app.seed_news(&format!("Article {i}"), true).await;
    }

    let (status, body) = app.get("/api/news?page=2&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["total"], 25);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["totalPages"], 3);

    let (_, body) = app.get("/api/news?page=3&limit=10", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let (_, body) = app.get("/api/news?page=9&limit=10", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 25);
}

#[tokio::test]
async fn test_invalid_list_parameters_are_rejected() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/news?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = app.get("/api/news?category=astrology", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid category 'astrology'");

    let (status, _) = app.get("/api/news?category=all", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_drafts_are_hidden_from_the_public() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    app.seed_news("Live", true).await;
    let draft = app.seed_news("Draft", false).await;

    let (_, body) = app.get("/api/news?published=false", None).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Live"]);

    let (status, _) = app.get(&format!("/api/news/{}", draft.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/admin/news", Some(&token)).await;
    assert_eq!(body["total"], 2);

    let (_, body) = app.get("/api/admin/news?published=false", Some(&token)).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["title"], "Draft");
}

#[tokio::test]
async fn test_unavailable_ebooks_are_hidden() {
    let app = TestApp::new();
    app.seed_ebook("On sale", 5.0, true).await;
    let pulled = app.seed_ebook("Pulled", 5.0, false).await;

    let (_, body) = app.get("/api/ebooks", None).await;
    assert_eq!(body["total"], 1);

    let (status, body) = app.get(&format!("/api/ebooks/{}", pulled.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "E-book not found");
}

#[tokio::test]
async fn test_search_and_category_filters() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    for (title, category) in [
        ("Rust 2030 released", "technology"),
        ("Markets rally", "business"),
        ("Local team wins", "sports"),
    ] {
        let (status, _) = app
            .post(
                "/api/admin/news",
                Some(&token),
                json!({"title": title, "content": "Body", "category": category}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app.get("/api/news?search=rust", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["title"], "Rust 2030 released");

    let (_, body) = app.get("/api/news?category=sports", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["category"], "sports");

    let (_, body) = app.get("/api/news?search=RALLY&category=business", None).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_ebooks_sort_by_price() {
    let app = TestApp::new();
    app.seed_ebook("Mid", 10.0, true).await;
    app.seed_ebook("Free", 0.0, true).await;
    app.seed_ebook("Pricey", 30.0, true).await;

    let (_, body) = app.get("/api/ebooks?sort=price-asc", None).await;
    let prices: Vec<f64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![0.0, 10.0, 30.0]);

    let (_, body) = app.get("/api/ebooks?sort=price-desc", None).await;
    assert_eq!(body["data"][0]["title"], "Pricey");
}

// --- Admin writes ---

#[tokio::test]
async fn test_create_coerces_form_values() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/admin/news",
            Some(&token),
            json!({
                "title": "  Form post ",
                "content": "Body",
                "published": "false",
                "featured": "1",
                "tags": "a, b",
                "category": "health"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["title"], "Form post");
    assert_eq!(data["published"], false);
    assert_eq!(data["featured"], true);
    assert_eq!(data["tags"], json!(["a", "b"]));
    assert_eq!(data["category"], "health");
    assert_eq!(data["excerpt"], "Body");
    assert_eq!(data["views"], 0);
}

#[tokio::test]
async fn test_create_requires_fields() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let (status, body) = app
        .post("/api/admin/news", Some(&token), json!({"content": "Body"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title is required");

    let (status, body) = app
        .post(
            "/api/admin/ebooks",
            Some(&token),
            json!({"title": "T", "author": "A", "description": "D", "fileUrl": "f", "price": -1}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "price must not be negative");

    let (status, body) = app
        .post(
            "/api/admin/vlogs",
            Some(&token),
            json!({"title": "T", "description": "D"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "videoUrl is required");
}

#[tokio::test]
async fn test_update_merges_submitted_fields() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let article = app.seed_news("Before", true).await;

    let (status, body) = app
        .put(
            &format!("/api/admin/news/{}", article.id),
            Some(&token),
            json!({"title": "After", "featured": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "News article updated");
    assert_eq!(body["data"]["title"], "After");
    assert_eq!(body["data"]["featured"], true);
    assert_eq!(body["data"]["content"], "Body of Before");

    let (status, body) = app
        .put(
            &format!("/api/admin/news/{}", Uuid::new_v4()),
            Some(&token),
            json!({"title": "Ghost"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "News article not found");
}

#[tokio::test]
async fn test_delete_removes_the_record() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let vlog = app.seed_vlog("Short lived", true).await;
    let uri = format!("/api/admin/vlogs/{}", vlog.id);

    let (status, body) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], vlog.id.to_string());

    let (status, _) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&format!("/api/vlogs/{}", vlog.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_ids_and_bodies_use_the_error_envelope() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let (status, body) = app.get("/api/news/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid id");

    let (status, body) = app
        .post(
            "/api/admin/news",
            Some(&token),
            json!({"title": "t", "content": "c", "published": "maybe"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}
