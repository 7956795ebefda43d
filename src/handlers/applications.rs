use axum::{Json, extract::State};
use uuid::Uuid;

use super::{IdPath, JsonBody};
use crate::{
    AppState,
    auth::{AdminUser, AuthUser},
    error::{ApiError, ApiResult},
    models::{ApiResponse, JobApplication, UpdateApplicationStatusRequest},
};

/// my_applications
///
/// [Authenticated Route] The caller's applications, newest first.
#[utoipa::path(
    get,
    path = "/api/applications/me",
    responses(
        (status = 200, description = "My applications", body = [JobApplication]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn my_applications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<JobApplication>>>> {
    let applications = state.repo.list_applications_for_user(auth.id).await?;
    Ok(Json(ApiResponse::ok(applications)))
}

/// job_applications
///
/// [Admin Route] Every application received for one posting.
#[utoipa::path(
    get,
    path = "/api/admin/jobs/{id}/applications",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Applications for the job", body = [JobApplication]),
        (status = 404, description = "Job not found")
    )
)]
pub async fn job_applications(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(job_id): IdPath,
) -> ApiResult<Json<ApiResponse<Vec<JobApplication>>>> {
    if state.repo.get_job(job_id).await?.is_none() {
        return Err(ApiError::not_found("Job"));
    }
    let applications = state.repo.list_applications_for_job(job_id).await?;
    Ok(Json(ApiResponse::ok(applications)))
}

/// update_application_status
///
/// [Admin Route] Moves an application through the review workflow.
#[utoipa::path(
    put,
    path = "/api/admin/applications/{id}/status",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = UpdateApplicationStatusRequest,
    responses(
        (status = 200, description = "Updated application", body = JobApplication),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn update_application_status(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<UpdateApplicationStatusRequest>,
) -> ApiResult<Json<ApiResponse<JobApplication>>> {
    let application = state
        .repo
        .set_application_status(id, payload.status)
        .await?
        .ok_or_else(|| ApiError::not_found("Application"))?;
    tracing::info!(application_id = %id, status = ?application.status, "application status changed");
    Ok(Json(ApiResponse::with_message(
        application,
        "Application status updated",
    )))
}
