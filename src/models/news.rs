use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{merge_optional, merge_text, required};
use crate::{
    error::ApiError,
    normalize::{lenient_bool, lenient_enum, non_blank, string_list},
};

/// Maximum length (in characters) of an excerpt derived from the article body.
pub const EXCERPT_LEN: usize = 150;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, TS, ToSchema,
)]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum NewsCategory {
    #[default]
    General,
    Technology,
    Business,
    Sports,
    Entertainment,
    Health,
    Politics,
    Education,
}

/// NewsArticle
///
/// A news item from the `news` collection. Only `published` articles are visible on
/// the public site; `views` is incremented on every public detail fetch.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewsArticle {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: NewsCategory,
    pub image: Option<String>,
    // FK to users.id of the admin who wrote it.
    pub author_id: Uuid,
    pub published: bool,
    pub featured: bool,
    pub tags: Vec<String>,
    #[ts(type = "number")]
    pub views: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// NewsInput
///
/// Admin form payload for both creation (POST) and partial update (PUT). On creation
/// `title` and `content` are required; everything else is defaulted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewsInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub category: Option<NewsCategory>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub published: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Option<Vec<String>>,
}

impl NewsInput {
    /// Builds a new article, validating required fields and filling defaults.
    pub fn into_article(self, author_id: Uuid, now: DateTime<Utc>) -> Result<NewsArticle, ApiError> {
        let title = required(self.title, "title")?;
        let content = required(self.content, "content")?;
        let excerpt = non_blank(self.excerpt).unwrap_or_else(|| derive_excerpt(&content));

        Ok(NewsArticle {
            id: Uuid::new_v4(),
            title,
            content,
            excerpt,
            category: self.category.unwrap_or_default(),
            image: non_blank(self.image),
            author_id,
            published: self.published.unwrap_or(true),
            featured: self.featured.unwrap_or(false),
            tags: self.tags.unwrap_or_default(),
            views: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merges the submitted fields into an existing article.
    pub fn apply_to(self, article: &mut NewsArticle, now: DateTime<Utc>) {
        merge_text(&mut article.title, self.title);
        merge_text(&mut article.content, self.content);
        merge_text(&mut article.excerpt, self.excerpt);
        merge_optional(&mut article.image, self.image);
        if let Some(category) = self.category {
            article.category = category;
        }
        if let Some(published) = self.published {
            article.published = published;
        }
        if let Some(featured) = self.featured {
            article.featured = featured;
        }
        if let Some(tags) = self.tags {
            article.tags = tags;
        }
        article.updated_at = now;
    }
}

/// First `EXCERPT_LEN` characters of the body, with an ellipsis when truncated.
pub fn derive_excerpt(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= EXCERPT_LEN {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(EXCERPT_LEN).collect();
    format!("{}...", cut.trim_end())
}
