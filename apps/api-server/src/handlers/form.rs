//! Multipart form collection for the admin article endpoints.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;
use serde::Deserialize;

use patrol_core::domain::NewSource;
use patrol_core::services::{CoverImage, ImageUpload};

use crate::middleware::error::AppError;

/// Upper bound for a single text part.
const MAX_TEXT_BYTES: usize = 2 * 1024 * 1024;

/// A multipart body split into text fields and file parts.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, ImageUpload>,
}

fn malformed(details: impl ToString) -> AppError {
    AppError::Malformed {
        error: "Invalid form data",
        details: details.to_string(),
    }
}

impl FormData {
    /// Read every part. Files keep at most one byte past the image limit so
    /// oversized uploads still fail validation without being buffered whole.
    pub async fn collect(mut payload: Multipart) -> Result<Self, AppError> {
        let mut form = FormData::default();

        while let Some(field) = payload.try_next().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            match file_name {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .map(|m| m.essence_str().to_string())
                        .unwrap_or_else(|| "application/octet-stream".to_string());
                    let bytes = read_capped(field, ImageUpload::MAX_BYTES + 1).await?;

                    // Browsers send an empty part for an untouched file input.
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        ImageUpload {
                            file_name,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let bytes = read_capped(field, MAX_TEXT_BYTES + 1).await?;
                    if bytes.len() > MAX_TEXT_BYTES {
                        return Err(malformed(format!("field '{name}' is too large")));
                    }
                    let value = String::from_utf8(bytes)
                        .map_err(|_| malformed(format!("field '{name}' is not valid UTF-8")))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Text value, `None` when absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text value with blanks treated as absent.
    pub fn non_blank(&self, name: &str) -> Option<String> {
        self.text(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Text value, empty when absent.
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default().to_string()
    }

    pub fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }
}

/// Drain a part, keeping at most `cap` bytes.
async fn read_capped(mut field: Field, cap: usize) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        let room = cap.saturating_sub(bytes.len());
        bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }
    Ok(bytes)
}

/// Category ids sent as a JSON array of numbers or numeric strings.
pub fn parse_id_list(raw: &str) -> Result<Vec<i32>, AppError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i32),
        Text(String),
    }

    let ids: Vec<Id> = serde_json::from_str(raw)
        .map_err(|e| malformed(format!("category ids must be a JSON array: {e}")))?;

    ids.into_iter()
        .map(|id| match id {
            Id::Number(n) => Ok(n),
            Id::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| malformed(format!("invalid category id '{s}'"))),
        })
        .collect()
}

/// Sources sent as a JSON array of `{name?, url?}`. Stored with the default type.
pub fn parse_sources(raw: &str) -> Result<Vec<NewSource>, AppError> {
    #[derive(Deserialize)]
    struct RawSource {
        name: Option<String>,
        url: Option<String>,
    }

    let sources: Vec<RawSource> = serde_json::from_str(raw)
        .map_err(|e| malformed(format!("sources must be a JSON array: {e}")))?;

    Ok(sources
        .into_iter()
        .map(|s| NewSource::from_raw(s.name.as_deref(), s.url.as_deref(), None))
        .collect())
}

/// Cover image from the admin edit form: `imageType` selects `imageUrl` or `imageFile`.
pub fn update_cover(form: &mut FormData) -> Result<Option<CoverImage>, AppError> {
    match form.non_blank("imageType").as_deref() {
        Some("file") => Ok(form.take_file("imageFile").map(CoverImage::Upload)),
        Some("url") | None => Ok(form.non_blank("imageUrl").map(CoverImage::Url)),
        Some(other) => Err(AppError::BadRequest(format!("Invalid image type: {other}"))),
    }
}

/// Cover image from the admin create form: an uploaded file wins over a URL.
pub fn create_cover(form: &mut FormData) -> Option<CoverImage> {
    form.take_file("coverImage")
        .map(CoverImage::Upload)
        .or_else(|| form.non_blank("coverImageUrl").map(CoverImage::Url))
}
