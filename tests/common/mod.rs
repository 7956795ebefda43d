// Shared by several test crates; not every helper is used by each of them.
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Duration, Utc};
use content_portal::{
    AppConfig, AppState, MemoryRepository, create_router,
    auth::issue_token,
    models::{
        EBook, EBookInput, JobInput, JobPosting, NewsArticle, NewsInput, Role, User, Vlog,
        VlogInput,
    },
    repository::{Repository, RepositoryState},
    storage::{MockStorageService, StorageState},
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

/// A router over a fresh in-memory store, plus a handle on that store for seeding and
/// for checking what the handlers persisted.
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryRepository>,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_storage(MockStorageService::new())
    }

    pub fn with_storage(storage: MockStorageService) -> Self {
        let repo = Arc::new(MemoryRepository::new());
        let config = AppConfig::default();
        let state = AppState {
            repo: repo.clone() as RepositoryState,
            storage: Arc::new(storage) as StorageState,
            config: config.clone(),
        };
        Self {
            router: create_router(state),
            repo,
            config,
        }
    }

    /// Inserts a user directly (no password hashing) and returns it with a valid token.
    pub async fn seed_user(&self, role: Role) -> (User, String) {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let user = User {
            id,
            name: format!("{role:?} {}", &id.simple().to_string()[..6]),
            email: format!("{}@example.com", id.simple()),
            password_hash: "not-a-real-hash".to_string(),
            role,
            is_verified: true,
            created_at: now,
            updated_at: now,
        };
        let user = self.repo.create_user(user).await.unwrap();
        let token = issue_token(&self.config, &user).unwrap();
        (user, token)
    }

    pub async fn admin_token(&self) -> String {
        self.seed_user(Role::Admin).await.1
    }

    pub async fn user_token(&self) -> String {
        self.seed_user(Role::User).await.1
    }

    pub async fn seed_news(&self, title: &str, published: bool) -> NewsArticle {
        let article = NewsInput {
            title: Some(title.to_string()),
            content: Some(format!("Body of {title}")),
            published: Some(published),
            ..Default::default()
        }
        .into_article(Uuid::new_v4(), Utc::now())
        .unwrap();
        self.repo.create_news(article).await.unwrap()
    }

    pub async fn seed_job(&self, title: &str, active: bool, deadline: Option<DateTime<Utc>>) -> JobPosting {
        let mut job = JobInput {
            title: Some(title.to_string()),
            company: Some("Acme".to_string()),
            location: Some("Remote".to_string()),
            description: Some("Build things".to_string()),
            active: Some(active),
            ..Default::default()
        }
        .into_posting(Uuid::new_v4(), Utc::now())
        .unwrap();
        job.deadline = deadline;
        self.repo.create_job(job).await.unwrap()
    }

    pub async fn seed_open_job(&self, title: &str) -> JobPosting {
        self.seed_job(title, true, Some(Utc::now() + Duration::days(30)))
            .await
    }

    pub async fn seed_vlog(&self, title: &str, published: bool) -> Vlog {
        let vlog = VlogInput {
            title: Some(title.to_string()),
            description: Some("A vlog".to_string()),
            video_url: Some("https://cdn.example.com/v.mp4".to_string()),
            published: Some(published),
            ..Default::default()
        }
        .into_vlog(Uuid::new_v4(), Utc::now())
        .unwrap();
        self.repo.create_vlog(vlog).await.unwrap()
    }

    pub async fn seed_ebook(&self, title: &str, price: f64, available: bool) -> EBook {
        let ebook = EBookInput {
            title: Some(title.to_string()),
            author: Some("Jane Doe".to_string()),
            description: Some("A book".to_string()),
            file_url: Some("https://cdn.example.com/book.pdf".to_string()),
            price: Some(price),
            available: Some(available),
            ..Default::default()
        }
        .into_ebook(Utc::now())
        .unwrap();
        self.repo.create_ebook(ebook).await.unwrap()
    }

    /// Sends one request through the router and returns the status and the JSON body
    /// (`Value::Null` for an empty or non-JSON body).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::POST, uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::PUT, uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::DELETE, uri, token, None)).await
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
