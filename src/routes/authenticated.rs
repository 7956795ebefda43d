use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router
///
/// Routes for any signed-in user. The router is wrapped in the auth middleware, and the
/// handlers also take `AuthUser`, which is where the caller's id comes from.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET/PUT /auth/me
        // Read or edit the caller's own profile.
        .route(
            "/auth/me",
            get(handlers::auth::me).put(handlers::auth::update_me),
        )
        // POST /jobs/{id}/apply
        // One application per user and posting; closed postings refuse new ones.
        .route("/jobs/{id}/apply", post(handlers::jobs::apply_to_job))
        .route(
            "/applications/me",
            get(handlers::applications::my_applications),
        )
        .route("/vlogs/{id}/like", post(handlers::vlogs::like_vlog))
}
