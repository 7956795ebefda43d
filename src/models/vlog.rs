use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{merge_optional, merge_text, required};
use crate::{
    error::ApiError,
    normalize::{lenient_bool, lenient_enum, non_blank},
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, TS, ToSchema,
)]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum VlogCategory {
    Technology,
    Lifestyle,
    Education,
    Entertainment,
    Travel,
    Food,
    #[default]
    Other,
}

/// Vlog
///
/// A video entry from the `vlogs` collection. The video itself is hosted elsewhere;
/// only its URL is stored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Vlog {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail: Option<String>,
    pub category: VlogCategory,
    // Display duration as entered ("12:30").
    pub duration: Option<String>,
    #[ts(type = "number")]
    pub views: i64,
    #[ts(type = "number")]
    pub likes: i64,
    pub published: bool,
    pub featured: bool,
    pub author_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VlogInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub category: Option<VlogCategory>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub published: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub featured: Option<bool>,
}

impl VlogInput {
    pub fn into_vlog(self, author_id: Uuid, now: DateTime<Utc>) -> Result<Vlog, ApiError> {
        Ok(Vlog {
            id: Uuid::new_v4(),
            title: required(self.title, "title")?,
            description: required(self.description, "description")?,
            video_url: required(self.video_url, "videoUrl")?,
            thumbnail: non_blank(self.thumbnail),
            category: self.category.unwrap_or_default(),
            duration: non_blank(self.duration),
            views: 0,
            likes: 0,
            published: self.published.unwrap_or(true),
            featured: self.featured.unwrap_or(false),
            author_id,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_to(self, vlog: &mut Vlog, now: DateTime<Utc>) {
        merge_text(&mut vlog.title, self.title);
        merge_text(&mut vlog.description, self.description);
        merge_text(&mut vlog.video_url, self.video_url);
        merge_optional(&mut vlog.thumbnail, self.thumbnail);
        merge_optional(&mut vlog.duration, self.duration);
        if let Some(category) = self.category {
            vlog.category = category;
        }
        if let Some(published) = self.published {
            vlog.published = published;
        }
        if let Some(featured) = self.featured {
            vlog.featured = featured;
        }
        vlog.updated_at = now;
    }
}
