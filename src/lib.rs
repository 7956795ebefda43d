use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::{Modify, OpenApi, openapi::path::Operation};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Modules ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod repository;
pub mod storage;

// Routers split by access level (public, authenticated, admin).
pub mod routes;
use auth::{AdminUser, AuthUser};
use routes::{admin, authenticated, public};

// --- Re-exports ---

pub use config::{AppConfig, Env};
pub use error::{ApiError, ApiResult};
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// OpenAPI document built from the `#[utoipa::path]` handlers and `ToSchema` models.
/// Served at `/api-docs/openapi.json`, browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    modifiers(&PublicWriteAliases),
    paths(
        handlers::auth::register, handlers::auth::login, handlers::auth::me,
        handlers::auth::update_me,
        handlers::news::list_news, handlers::news::get_news, handlers::news::admin_list_news,
        handlers::news::admin_get_news, handlers::news::create_news, handlers::news::update_news,
        handlers::news::delete_news,
        handlers::jobs::list_jobs, handlers::jobs::get_job, handlers::jobs::apply_to_job,
        handlers::jobs::admin_list_jobs, handlers::jobs::admin_get_job,
        handlers::jobs::create_job, handlers::jobs::update_job, handlers::jobs::delete_job,
        handlers::vlogs::list_vlogs, handlers::vlogs::get_vlog, handlers::vlogs::like_vlog,
        handlers::vlogs::admin_list_vlogs, handlers::vlogs::admin_get_vlog,
        handlers::vlogs::create_vlog, handlers::vlogs::update_vlog, handlers::vlogs::delete_vlog,
        handlers::ebooks::list_ebooks, handlers::ebooks::get_ebook,
        handlers::ebooks::admin_list_ebooks, handlers::ebooks::admin_get_ebook,
        handlers::ebooks::create_ebook, handlers::ebooks::update_ebook,
        handlers::ebooks::delete_ebook,
        handlers::applications::my_applications, handlers::applications::job_applications,
        handlers::applications::update_application_status,
        handlers::users::list_users, handlers::users::get_user, handlers::users::create_user,
        handlers::users::update_user, handlers::users::delete_user,
        handlers::stats::get_stats, handlers::upload::upload_file,
    ),
    components(
        schemas(
            models::NewsArticle, models::NewsInput, models::NewsCategory,
            models::JobPosting, models::JobInput, models::JobType, models::JobCategory,
            models::JobApplication, models::ApplyRequest, models::ApplicationStatus,
            models::UpdateApplicationStatusRequest,
            models::Vlog, models::VlogInput, models::VlogCategory,
            models::EBook, models::EBookInput, models::EBookCategory,
            models::UserProfile, models::Role, models::RegisterRequest, models::LoginRequest,
            models::AuthResponse, models::UpdateProfileRequest, models::CreateUserRequest,
            models::UpdateUserRequest, models::DashboardStats, models::UploadResponse,
            models::SortOrder, handlers::upload::UploadForm,
        )
    ),
    tags(
        (name = "content-portal", description = "News, jobs, vlogs and e-books API")
    )
)]
pub struct ApiDoc;

/// The content write handlers are mounted on both `/api/admin/<resource>` and
/// `/api/<resource>`; copies the admin write operations onto the public paths.
struct PublicWriteAliases;

impl Modify for PublicWriteAliases {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        for resource in ["news", "jobs", "vlogs", "ebooks"] {
            for suffix in ["", "/{id}"] {
                let admin_path = format!("/api/admin/{resource}{suffix}");
                let Some(admin) = openapi.paths.paths.get(&admin_path).cloned() else {
                    continue;
                };
                let public = openapi
                    .paths
                    .paths
                    .entry(format!("/api/{resource}{suffix}"))
                    .or_default();
                public.post = admin.post.map(public_alias);
                public.put = admin.put.map(public_alias);
                public.delete = admin.delete.map(public_alias);
            }
        }
    }
}

// Operation ids must stay unique across the document.
fn public_alias(mut operation: Operation) -> Operation {
    operation.operation_id = operation.operation_id.map(|id| format!("{id}_public"));
    operation
}

/// AppState
///
/// Everything a handler may need, cloned into each request. All members are cheap to
/// clone (`Arc`s and a small config struct).
#[derive(Clone)]
pub struct AppState {
    /// Persistence: Postgres, or the in-memory store for local runs and tests.
    pub repo: RepositoryState,
    /// Object storage for uploads.
    pub storage: StorageState,
    pub config: AppConfig,
}

// --- FromRef substates ---
// Extractors ask for the piece they need (e.g. `AuthUser` only needs `AppConfig`).

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Gate for the authenticated router. Extracting `AuthUser` is the whole check: a missing
/// or invalid token is rejected with 401 before the handler runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// admin_middleware
///
/// Gate for the admin router: 401 without a valid token, 403 for a non-admin one.
async fn admin_middleware(_admin: AdminUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Builds the full application: the three routers under `/api`, Swagger UI, and the
/// observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let api = Router::new()
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .nest(
            "/admin",
            admin::admin_routes(state.config.max_upload_bytes).route_layer(
                middleware::from_fn_with_state(state.clone(), admin_middleware),
            ),
        );

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .with_state(state);

    app.layer(
        ServiceBuilder::new()
            // Every request gets an x-request-id (kept if the client sent one).
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            // Echo the id back so clients can quote it in bug reports.
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
    .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer`: method, URI and request id, so every log line of one request
/// can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let req_id = request
        .headers()
        .get("x-request-id")
        .and_then(|id| id.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %req_id,
    )
}
