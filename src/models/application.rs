use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::required;
use crate::{error::ApiError, normalize::non_blank};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, TS, ToSchema,
)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Accepted,
}

/// JobApplication
///
/// One user's application to one posting. The pair (`job_id`, `applicant_id`) is unique.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JobApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub resume_url: String,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// ApplyRequest
///
/// Input payload for POST /api/jobs/{id}/apply. The resume is usually a URL returned by
/// the upload endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ApplyRequest {
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

impl ApplyRequest {
    pub fn into_application(
        self,
        job_id: Uuid,
        applicant_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<JobApplication, ApiError> {
        Ok(JobApplication {
            id: Uuid::new_v4(),
            job_id,
            applicant_id,
            resume_url: required(self.resume_url, "resumeUrl")?,
            cover_letter: non_blank(self.cover_letter),
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateApplicationStatusRequest {
    pub status: ApplicationStatus,
}
