use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{merge_optional, merge_text, required};
use crate::{
    error::ApiError,
    normalize::{lenient_bool, lenient_datetime, lenient_enum, non_blank, string_list},
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, TS, ToSchema,
)]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, TS, ToSchema,
)]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum JobCategory {
    Technology,
    Healthcare,
    Finance,
    Education,
    Marketing,
    Engineering,
    Sales,
    #[default]
    Other,
}

/// JobPosting
///
/// A vacancy from the `jobs` collection. A posting accepts applications only while it is
/// open: `active` and not past its `deadline`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    // `type` is a reserved keyword in Rust; the wire name stays "type".
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub category: JobCategory,
    pub description: String,
    pub requirements: Vec<String>,
    // Free text ("$80k - $100k", "Negotiable").
    pub salary: Option<String>,
    pub application_email: Option<String>,
    pub application_url: Option<String>,
    #[ts(type = "string | null")]
    pub deadline: Option<DateTime<Utc>>,
    pub active: bool,
    pub featured: bool,
    #[ts(type = "number")]
    pub views: i64,
    /// Number of applications referencing this posting (derived, read-only).
    #[sqlx(default)]
    #[ts(type = "number")]
    pub application_count: i64,
    // FK to users.id of the admin who posted it.
    pub posted_by: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl JobPosting {
    /// Whether the posting is listed publicly and accepts applications at `now`.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.active && self.deadline.is_none_or(|deadline| deadline > now)
    }
}

/// JobInput
///
/// Admin form payload for creating and partially updating postings. On creation
/// `title`, `company`, `location` and `description` are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JobInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_enum")]
    pub job_type: Option<JobType>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub category: Option<JobCategory>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub requirements: Option<Vec<String>>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub application_email: Option<String>,
    #[serde(default)]
    pub application_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    #[ts(type = "string | null")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub featured: Option<bool>,
}

impl JobInput {
    pub fn into_posting(self, posted_by: Uuid, now: DateTime<Utc>) -> Result<JobPosting, ApiError> {
        let title = required(self.title, "title")?;
        let company = required(self.company, "company")?;
        let location = required(self.location, "location")?;
        let description = required(self.description, "description")?;
        let application_email = non_blank(self.application_email);
        validate_contact_email(application_email.as_deref())?;

        Ok(JobPosting {
            id: Uuid::new_v4(),
            title,
            company,
            location,
            job_type: self.job_type.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            description,
            requirements: self.requirements.unwrap_or_default(),
            salary: non_blank(self.salary),
            application_email,
            application_url: non_blank(self.application_url),
            deadline: self.deadline,
            active: self.active.unwrap_or(true),
            featured: self.featured.unwrap_or(false),
            views: 0,
            application_count: 0,
            posted_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_to(self, job: &mut JobPosting, now: DateTime<Utc>) -> Result<(), ApiError> {
        if let Some(email) = self.application_email.as_deref() {
            validate_contact_email(Some(email.trim()).filter(|e| !e.is_empty()))?;
        }
        merge_text(&mut job.title, self.title);
        merge_text(&mut job.company, self.company);
        merge_text(&mut job.location, self.location);
        merge_text(&mut job.description, self.description);
        merge_optional(&mut job.salary, self.salary);
        merge_optional(&mut job.application_email, self.application_email);
        merge_optional(&mut job.application_url, self.application_url);
        if let Some(job_type) = self.job_type {
            job.job_type = job_type;
        }
        if let Some(category) = self.category {
            job.category = category;
        }
        if let Some(requirements) = self.requirements {
            job.requirements = requirements;
        }
        if let Some(deadline) = self.deadline {
            job.deadline = Some(deadline);
        }
        if let Some(active) = self.active {
            job.active = active;
        }
        if let Some(featured) = self.featured {
            job.featured = featured;
        }
        job.updated_at = now;
        Ok(())
    }
}

fn validate_contact_email(email: Option<&str>) -> Result<(), ApiError> {
    match email {
        Some(e) if !e.contains('@') => Err(ApiError::bad_request(
            "applicationEmail must be a valid email address",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn posting(now: DateTime<Utc>) -> JobPosting {
        JobInput {
            title: Some("Engineer".into()),
            company: Some("Acme".into()),
            location: Some("Remote".into()),
            description: Some("Build things".into()),
            ..Default::default()
        }
        .into_posting(Uuid::nil(), now)
        .unwrap()
    }

    #[test]
    fn test_open_requires_active_and_future_deadline() {
        let now = Utc::now();
        let mut job = posting(now);
        assert!(job.is_open(now), "no deadline and active means open");

        job.deadline = Some(now - Duration::days(1));
        assert!(!job.is_open(now), "past deadline is treated as inactive");

        job.deadline = Some(now + Duration::days(1));
        assert!(job.is_open(now));

        job.active = false;
        assert!(!job.is_open(now));
    }

    #[test]
    fn test_wire_name_of_job_type_is_type() {
        let input: JobInput =
            serde_json::from_str(r#"{"type":"part-time","active":"false","requirements":"Rust\nSQL"}"#)
                .unwrap();
        assert_eq!(input.job_type, Some(JobType::PartTime));
        assert_eq!(input.active, Some(false));
        assert_eq!(
            input.requirements,
            Some(vec!["Rust".to_string(), "SQL".to_string()])
        );

        let body = serde_json::to_value(posting(Utc::now())).unwrap();
        assert_eq!(body["type"], "full-time");
        assert_eq!(body["category"], "other");
    }

    #[test]
    fn test_missing_company_is_rejected() {
        let err = JobInput {
            title: Some("Engineer".into()),
            ..Default::default()
        }
        .into_posting(Uuid::nil(), Utc::now())
        .unwrap_err();
        assert_eq!(err.to_string(), "company is required");
    }

    #[test]
    fn test_invalid_contact_email_is_rejected() {
        let mut job = posting(Utc::now());
        let result = JobInput {
            application_email: Some("not-an-email".into()),
            ..Default::default()
        }
        .apply_to(&mut job, Utc::now());
        assert!(result.is_err());
        assert_eq!(job.application_email, None);
    }
}
