use axum::{Json, extract::State};
use chrono::Utc;

use crate::{
    AppState,
    auth::AdminUser,
    error::ApiResult,
    models::{ApiResponse, DashboardStats},
};

/// get_stats
///
/// [Admin Route] Collection counts for the dashboard. `openJobs` uses the same open rule
/// as the public job listing.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<DashboardStats>>> {
    let stats = state.repo.get_stats(Utc::now()).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
