use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{merge_optional, merge_text, required};
use crate::{
    error::ApiError,
    normalize::{lenient_bool, lenient_enum, lenient_f64, non_blank},
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, TS, ToSchema,
)]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum EBookCategory {
    Fiction,
    NonFiction,
    Technology,
    Business,
    SelfHelp,
    Education,
    #[default]
    Other,
}

/// EBook
///
/// A downloadable book from the `ebooks` collection. `downloads` is incremented on every
/// public detail fetch, which is how the client obtains `file_url`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EBook {
    pub id: Uuid,
    pub title: String,
    // Free text; book authors are not platform users.
    pub author: String,
    pub description: String,
    pub category: EBookCategory,
    // Payment is not processed here; the price is informational.
    pub price: f64,
    pub file_url: String,
    pub cover_image: Option<String>,
    #[ts(type = "number")]
    pub downloads: i64,
    pub available: bool,
    pub featured: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EBookInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub category: Option<EBookCategory>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub available: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub featured: Option<bool>,
}

impl EBookInput {
    pub fn into_ebook(self, now: DateTime<Utc>) -> Result<EBook, ApiError> {
        let price = validate_price(self.price)?.unwrap_or(0.0);
        Ok(EBook {
            id: Uuid::new_v4(),
            title: required(self.title, "title")?,
            author: required(self.author, "author")?,
            description: required(self.description, "description")?,
            category: self.category.unwrap_or_default(),
            price,
            file_url: required(self.file_url, "fileUrl")?,
            cover_image: non_blank(self.cover_image),
            downloads: 0,
            available: self.available.unwrap_or(true),
            featured: self.featured.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_to(self, ebook: &mut EBook, now: DateTime<Utc>) -> Result<(), ApiError> {
        if let Some(price) = validate_price(self.price)? {
            ebook.price = price;
        }
        merge_text(&mut ebook.title, self.title);
        merge_text(&mut ebook.author, self.author);
        merge_text(&mut ebook.description, self.description);
        merge_text(&mut ebook.file_url, self.file_url);
        merge_optional(&mut ebook.cover_image, self.cover_image);
        if let Some(category) = self.category {
            ebook.category = category;
        }
        if let Some(available) = self.available {
            ebook.available = available;
        }
        if let Some(featured) = self.featured {
            ebook.featured = featured;
        }
        ebook.updated_at = now;
        Ok(())
    }
}

fn validate_price(price: Option<f64>) -> Result<Option<f64>, ApiError> {
    match price {
        Some(p) if p < 0.0 => Err(ApiError::bad_request("price must not be negative")),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_string_is_coerced_and_validated() {
        let input: EBookInput = serde_json::from_str(
            r#"{"title":"T","author":"A","description":"D","fileUrl":"f.pdf","price":"9.99","category":"self-help"}"#,
        )
        .unwrap();
        let ebook = input.into_ebook(Utc::now()).unwrap();
        assert_eq!(ebook.price, 9.99);
        assert_eq!(ebook.category, EBookCategory::SelfHelp);
        assert!(ebook.available);

        let negative = EBookInput {
            title: Some("T".into()),
            author: Some("A".into()),
            description: Some("D".into()),
            file_url: Some("f.pdf".into()),
            price: Some(-1.0),
            ..Default::default()
        };
        assert!(negative.into_ebook(Utc::now()).is_err());
    }
}
