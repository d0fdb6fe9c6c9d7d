//! Admin article endpoints - moderation list, detail, create, edit and lifecycle actions.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use patrol_core::domain::{ArticleStatus, NewSource};
use patrol_core::services::{CreateArticle, LifecycleAction, TransitionOutcome, UpdateArticle};
use patrol_shared::ApiResponse;
use patrol_shared::dto::{ArticlePayload, ArticlesPayload, ReviewQuery, TransitionRequest};

use super::form::{self, FormData};
use crate::middleware::auth::AdminSession;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// `None` for "all" or an absent filter.
fn status_filter(raw: Option<&str>) -> AppResult<Option<ArticleStatus>> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid status: {value}"))),
    }
}

/// GET /admin/api/articles.json?status=
pub async fn list_articles(
    _session: AdminSession,
    state: web::Data<AppState>,
    query: web::Query<ReviewQuery>,
) -> AppResult<HttpResponse> {
    let status = status_filter(query.status.as_deref())?;
    let articles = state.articles.list_for_review(status).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ArticlesPayload { articles })))
}

/// GET /admin/api/articles/{id}.json
pub async fn get_article(
    _session: AdminSession,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let article = state.articles.detail(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ArticlePayload { article }))
}

fn create_input(mut form: FormData) -> AppResult<CreateArticle> {
    let category_ids = match form.non_blank("categories") {
        Some(raw) => form::parse_id_list(&raw)?,
        None => Vec::new(),
    };
    let source = match (form.non_blank("sourceName"), form.non_blank("sourceUrl")) {
        (None, None) => None,
        (name, url) => Some(NewSource::from_raw(name.as_deref(), url.as_deref(), None)),
    };

    Ok(CreateArticle {
        title: form.text_or_empty("title"),
        excerpt: form.text_or_empty("excerpt"),
        content: form.text_or_empty("content"),
        cover: form::create_cover(&mut form),
        cover_image_alt: form.non_blank("coverImageAlt"),
        category_ids,
        source,
    })
}

/// POST /admin/api/articles.json (multipart)
pub async fn create_article(
    session: AdminSession,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = FormData::collect(payload).await?;
    let article = state.articles.create(create_input(form)?).await?;

    tracing::info!(
        admin_id = %session.admin_id,
        email = %session.email,
        article_id = %article.id,
        "Article created by admin"
    );
    Ok(HttpResponse::Created().json(ArticlePayload { article }))
}

fn update_input(mut form: FormData) -> AppResult<UpdateArticle> {
    let category_ids = form
        .non_blank("categoryIds")
        .map(|raw| form::parse_id_list(&raw))
        .transpose()?;
    let sources = form
        .non_blank("sources")
        .map(|raw| form::parse_sources(&raw))
        .transpose()?;
    let cover = form::update_cover(&mut form)?;

    Ok(UpdateArticle {
        title: form.text_or_empty("title"),
        slug: form.text_or_empty("slug"),
        excerpt: form
            .non_blank("description")
            .or_else(|| form.non_blank("excerpt")),
        content: form.text_or_empty("content"),
        cover,
        category_ids,
        sources,
    })
}

/// PUT /admin/api/articles/{id}.json (multipart)
pub async fn update_article(
    session: AdminSession,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let id = id.into_inner();
    let form = FormData::collect(payload).await?;
    let article = state.articles.update(id, update_input(form)?).await?;

    tracing::info!(
        admin_id = %session.admin_id,
        email = %session.email,
        article_id = %id,
        "Article edited by admin"
    );
    Ok(HttpResponse::Ok().json(ApiResponse::ok(ArticlePayload { article })))
}

/// PATCH /admin/api/articles/{id}.json with `{"action": ...}`
pub async fn transition_article(
    session: AdminSession,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<TransitionRequest>,
) -> AppResult<HttpResponse> {
    let id = id.into_inner();
    let action = body
        .action
        .parse::<LifecycleAction>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let outcome = state.articles.transition(id, action).await?;
    tracing::info!(
        admin_id = %session.admin_id,
        email = %session.email,
        article_id = %id,
        ?action,
        "Lifecycle action applied"
    );

    Ok(match outcome {
        TransitionOutcome::Updated(article) => HttpResponse::Ok().json(ArticlePayload { article }),
        TransitionOutcome::Deleted => HttpResponse::Ok().json(ApiResponse::acknowledged()),
    })
}
