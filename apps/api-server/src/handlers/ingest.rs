//! Article ingestion endpoint for automated publishers.

use actix_web::{HttpResponse, web};

use patrol_core::domain::NewSource;
use patrol_core::services::IngestArticle;
use patrol_shared::ApiResponse;
use patrol_shared::dto::{ArticlePayload, IngestArticleRequest};

use crate::middleware::auth::ApiKey;
use crate::middleware::error::AppResult;
use crate::observability::RequestId;
use crate::state::AppState;

fn ingest_input(req: IngestArticleRequest) -> IngestArticle {
    IngestArticle {
        title: req.title,
        content: req.content,
        slug: req.slug,
        excerpt: req.excerpt,
        reading_time: req.reading_time,
        cover_image_path: req.cover_image_path,
        cover_image_alt: req.cover_image_alt,
        author_id: req.author_id,
        category_ids: req.category_ids,
        sources: req
            .sources
            .into_iter()
            .map(|s| NewSource::from_raw(s.name.as_deref(), s.url.as_deref(), s.source_type.as_deref()))
            .collect(),
    }
}

/// POST /api/articles/create.json
pub async fn create_article(
    _key: ApiKey,
    request_id: RequestId,
    state: web::Data<AppState>,
    body: web::Json<IngestArticleRequest>,
) -> AppResult<HttpResponse> {
    tracing::debug!(request_id = request_id.as_str(), "Ingesting article");

    let article = state.articles.ingest(ingest_input(body.into_inner())).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        ArticlePayload { article },
        "Article created successfully",
    )))
}
