use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router
///
/// Anonymous access. The list and detail handlers restrict themselves to visible
/// records (published news and vlogs, open jobs, available e-books).
///
/// The write methods registered on the same paths (`POST /news`, `PUT /news/{id}`, ...)
/// take the `AdminUser` extractor, so they answer 401/403 to anyone but an admin. Each
/// path is registered once because axum rejects overlapping method routers.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // --- Auth ---
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // --- News ---
        .route(
            "/news",
            get(handlers::news::list_news).post(handlers::news::create_news),
        )
        .route(
            "/news/{id}",
            get(handlers::news::get_news)
                .put(handlers::news::update_news)
                .delete(handlers::news::delete_news),
        )
        // --- Jobs ---
        .route(
            "/jobs",
            get(handlers::jobs::list_jobs).post(handlers::jobs::create_job),
        )
        .route(
            "/jobs/{id}",
            get(handlers::jobs::get_job)
                .put(handlers::jobs::update_job)
                .delete(handlers::jobs::delete_job),
        )
        // --- Vlogs ---
        .route(
            "/vlogs",
            get(handlers::vlogs::list_vlogs).post(handlers::vlogs::create_vlog),
        )
        .route(
            "/vlogs/{id}",
            get(handlers::vlogs::get_vlog)
                .put(handlers::vlogs::update_vlog)
                .delete(handlers::vlogs::delete_vlog),
        )
        // --- E-books ---
        .route(
            "/ebooks",
            get(handlers::ebooks::list_ebooks).post(handlers::ebooks::create_ebook),
        )
        .route(
            "/ebooks/{id}",
            get(handlers::ebooks::get_ebook)
                .put(handlers::ebooks::update_ebook)
                .delete(handlers::ebooks::delete_ebook),
        )
}
