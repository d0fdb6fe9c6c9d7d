//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/articles/create.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub reading_time: Option<i32>,
    pub cover_image_path: Option<String>,
    pub cover_image_alt: Option<String>,
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
    #[serde(default)]
    pub sources: Vec<SourceInput>,
}

/// A source reference as sent by clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceInput {
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub source_type: Option<String>,
}

/// Body of `PATCH /admin/api/articles/{id}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionRequest {
    pub action: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to create another admin account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateAdminRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_super_admin: bool,
}

/// Query string of `GET /api/articles.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListArticlesQuery {
    pub category: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Query string of `GET /admin/api/articles.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewQuery {
    pub status: Option<String>,
}

/// Query string of `GET /api/search.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// One hit of the public search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub cover_image_path: Option<String>,
    pub cover_image_alt: Option<String>,
    pub reading_time: Option<i32>,
    /// Name of the first category.
    pub category: Option<String>,
    /// Public path, `/{category}/{slug}` or `/{slug}`.
    pub url: String,
}

/// Response containing an admin's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_super_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticlePayload<T> {
    pub article: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticlesPayload<T> {
    pub articles: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesPayload<T> {
    pub categories: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorsPayload<T> {
    pub authors: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminPayload {
    pub admin: AdminResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_request_rejects_unknown_fields() {
        let result = serde_json::from_str::<IngestArticleRequest>(
            r#"{"title": "T", "content": "C", "status": "approved"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_ingest_request_defaults() {
        let req: IngestArticleRequest = serde_json::from_str(
            r#"{"title": "T", "sources": [{"url": "https://x.io", "type": "video"}]}"#,
        )
        .unwrap();

        assert_eq!(req.content, None);
        assert!(req.category_ids.is_empty());
        assert_eq!(req.sources[0].source_type.as_deref(), Some("video"));
    }
}
