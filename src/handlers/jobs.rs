use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use super::{IdPath, JsonBody, ListParams, QueryParams};
use crate::{
    AppState,
    auth::{AdminUser, AuthUser},
    error::{ApiError, ApiResult},
    models::{
        ApiResponse, ApplyRequest, JobApplication, JobCategory, JobInput, JobPosting, Paginated,
    },
};

/// list_jobs
///
/// [Public Route] Open postings only: active and not past their deadline.
#[utoipa::path(
    get,
    path = "/api/jobs",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated open postings", body = [JobPosting]),
        (status = 400, description = "Invalid query parameter")
    )
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Paginated<JobPosting>>> {
    let mut filter = params.content_filter::<JobCategory>(None)?;
    filter.visible = Some(true);
    let page = state.repo.list_jobs(&filter, Utc::now()).await?;
    Ok(Json(Paginated::new(page, filter.pagination)))
}

/// get_job
///
/// [Public Route] Returns an open posting and counts the view.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Posting, views already incremented", body = JobPosting),
        (status = 404, description = "Missing, inactive or expired")
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<JobPosting>>> {
    let now = Utc::now();
    let open = state
        .repo
        .get_job(id)
        .await?
        .is_some_and(|job| job.is_open(now));
    if !open {
        return Err(ApiError::not_found("Job"));
    }

    let job = state
        .repo
        .increment_job_views(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    Ok(Json(ApiResponse::ok(job)))
}

/// apply_to_job
///
/// [Authenticated Route] Submits the caller's application. One application per user
/// and posting; the store's unique constraint backs the pre-check below.
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/apply",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application submitted", body = JobApplication),
        (status = 400, description = "Closed posting, duplicate application or missing resumeUrl"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Job not found")
    )
)]
pub async fn apply_to_job(
    auth: AuthUser,
    State(state): State<AppState>,
    IdPath(job_id): IdPath,
    JsonBody(payload): JsonBody<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<JobApplication>>)> {
    let now = Utc::now();
    let job = state
        .repo
        .get_job(job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;

    if !job.is_open(now) {
        return Err(ApiError::bad_request(
            "This job is no longer accepting applications",
        ));
    }
    if state.repo.find_application(job_id, auth.id).await?.is_some() {
        return Err(ApiError::bad_request("You have already applied for this job"));
    }

    let application = payload.into_application(job_id, auth.id, now)?;
    let application = state.repo.create_application(application).await?;
    tracing::info!(job_id = %job_id, applicant_id = %auth.id, "application submitted");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            application,
            "Application submitted successfully",
        )),
    ))
}

/// admin_list_jobs
///
/// [Admin Route] Every posting. `active=true` narrows to open postings, `active=false`
/// to inactive or expired ones.
#[utoipa::path(
    get,
    path = "/api/admin/jobs",
    params(ListParams),
    responses((status = 200, description = "Paginated postings", body = [JobPosting]))
)]
pub async fn admin_list_jobs(
    _admin: AdminUser,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Paginated<JobPosting>>> {
    let filter = params.content_filter::<JobCategory>(params.active.as_deref())?;
    let page = state.repo.list_jobs(&filter, Utc::now()).await?;
    Ok(Json(Paginated::new(page, filter.pagination)))
}

#[utoipa::path(
    get,
    path = "/api/admin/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Posting", body = JobPosting),
        (status = 404, description = "Not found")
    )
)]
pub async fn admin_get_job(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<JobPosting>>> {
    let job = state
        .repo
        .get_job(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    Ok(Json(ApiResponse::ok(job)))
}

/// create_job
///
/// [Admin Route] The caller is recorded as `postedBy`.
#[utoipa::path(
    post,
    path = "/api/admin/jobs",
    request_body = JobInput,
    responses(
        (status = 201, description = "Created", body = JobPosting),
        (status = 400, description = "Missing required field or invalid contact email")
    )
)]
pub async fn create_job(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<JobInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<JobPosting>>)> {
    let job = input.into_posting(admin.id, Utc::now())?;
    let job = state.repo.create_job(job).await?;
    tracing::info!(job_id = %job.id, "job posting created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(job, "Job created")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = JobInput,
    responses(
        (status = 200, description = "Updated", body = JobPosting),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_job(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<JobInput>,
) -> ApiResult<Json<ApiResponse<JobPosting>>> {
    let mut job = state
        .repo
        .get_job(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    input.apply_to(&mut job, Utc::now())?;

    let job = state
        .repo
        .update_job(job)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    Ok(Json(ApiResponse::with_message(job, "Job updated")))
}

/// delete_job
///
/// [Admin Route] Removes the posting together with its applications.
#[utoipa::path(
    delete,
    path = "/api/admin/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_job(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<Uuid>>> {
    if !state.repo.delete_job(id).await? {
        return Err(ApiError::not_found("Job"));
    }
    tracing::info!(job_id = %id, "job posting deleted");
    Ok(Json(ApiResponse::with_message(id, "Job deleted")))
}
