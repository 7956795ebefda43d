use crate::{AppState, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Admin Router
///
/// The back office API, nested under `/admin`. `create_router` wraps this router in the
/// admin middleware (401 without a token, 403 for a non-admin one), and every handler
/// takes `AdminUser` as well.
///
/// Admin reads see drafts, closed postings and unavailable books, and never bump
/// counters.
pub fn admin_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        .route("/stats", get(handlers::stats::get_stats))
        // --- News ---
        .route(
            "/news",
            get(handlers::news::admin_list_news).post(handlers::news::create_news),
        )
        .route(
            "/news/{id}",
            get(handlers::news::admin_get_news)
                .put(handlers::news::update_news)
                .delete(handlers::news::delete_news),
        )
        // --- Jobs & Applications ---
        .route(
            "/jobs",
            get(handlers::jobs::admin_list_jobs).post(handlers::jobs::create_job),
        )
        .route(
            "/jobs/{id}",
            get(handlers::jobs::admin_get_job)
                .put(handlers::jobs::update_job)
                .delete(handlers::jobs::delete_job),
        )
        .route(
            "/jobs/{id}/applications",
            get(handlers::applications::job_applications),
        )
        .route(
            "/applications/{id}/status",
            put(handlers::applications::update_application_status),
        )
        // --- Vlogs ---
        .route(
            "/vlogs",
            get(handlers::vlogs::admin_list_vlogs).post(handlers::vlogs::create_vlog),
        )
        .route(
            "/vlogs/{id}",
            get(handlers::vlogs::admin_get_vlog)
                .put(handlers::vlogs::update_vlog)
                .delete(handlers::vlogs::delete_vlog),
        )
        // --- E-books ---
        .route(
            "/ebooks",
            get(handlers::ebooks::admin_list_ebooks).post(handlers::ebooks::create_ebook),
        )
        .route(
            "/ebooks/{id}",
            get(handlers::ebooks::admin_get_ebook)
                .put(handlers::ebooks::update_ebook)
                .delete(handlers::ebooks::delete_ebook),
        )
        // --- Users ---
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        // POST /admin/upload
        // Multipart upload to object storage. The body limit is raised for this route
        // only; the handler still enforces the exact file size.
        .route(
            "/upload",
            post(handlers::upload::upload_file)
                .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)),
        )
}
