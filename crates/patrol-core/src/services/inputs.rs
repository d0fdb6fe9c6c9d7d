//! Inputs accepted by the article service.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::NewSource;
use crate::error::DomainError;

/// Fields of an article pushed through the ingestion endpoint.
#[derive(Debug, Clone, Default)]
pub struct IngestArticle {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub reading_time: Option<i32>,
    pub cover_image_path: Option<String>,
    pub cover_image_alt: Option<String>,
    pub author_id: Option<Uuid>,
    pub category_ids: Vec<i32>,
    pub sources: Vec<NewSource>,
}

/// Article created from the admin form.
#[derive(Debug, Clone, Default)]
pub struct CreateArticle {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub cover: Option<CoverImage>,
    pub cover_image_alt: Option<String>,
    pub category_ids: Vec<i32>,
    pub source: Option<NewSource>,
}

/// Full overwrite of an article from the admin form.
#[derive(Debug, Clone, Default)]
pub struct UpdateArticle {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover: Option<CoverImage>,
    pub category_ids: Option<Vec<i32>>,
    pub sources: Option<Vec<NewSource>>,
}

/// Cover image given either as a URL or as an uploaded file.
#[derive(Debug, Clone)]
pub enum CoverImage {
    Url(String),
    Upload(ImageUpload),
}

/// An uploaded image file.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Upper bound for cover images.
    pub const MAX_BYTES: usize = 5 * 1024 * 1024;

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.bytes.len() > Self::MAX_BYTES {
            return Err(DomainError::Validation(
                "Image too large (max 5MB)".to_string(),
            ));
        }
        if !self.content_type.starts_with("image/") {
            return Err(DomainError::Validation(
                "Unsupported file type".to_string(),
            ));
        }
        Ok(())
    }

    /// File extension taken from the original name, or the MIME subtype.
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .or_else(|| self.content_type.split_once('/').map(|(_, sub)| sub))
            .unwrap_or("bin")
            .to_ascii_lowercase()
    }

    /// Collision-free object name: `{unix_millis}-{uuid}.{ext}`.
    pub fn object_name(&self) -> String {
        format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            self.extension()
        )
    }
}
