//! Public read endpoints - categories, authors, search and published articles.

use actix_web::{HttpResponse, web};

use patrol_core::domain::ArticleListing;
use patrol_shared::ApiResponse;
use patrol_shared::dto::{
    ArticlePayload, ArticlesPayload, AuthorsPayload, CategoriesPayload, ListArticlesQuery,
    SearchQuery, SearchResult,
};

use crate::middleware::auth::OptionalApiKey;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories/list.json
pub async fn list_categories(
    _key: OptionalApiKey,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(CategoriesPayload { categories })))
}

/// GET /api/authors/list.json
pub async fn list_authors(
    _key: OptionalApiKey,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let authors = state.authors.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(AuthorsPayload { authors })))
}

fn search_result(listing: ArticleListing) -> SearchResult {
    let url = listing.public_path();
    let category = listing.primary_category().map(|c| c.name.clone());
    let article = listing.article;

    SearchResult {
        id: article.id,
        title: article.title,
        slug: article.slug,
        excerpt: article.excerpt,
        cover_image_path: article.cover_image_path,
        cover_image_alt: article.cover_image_alt,
        reading_time: article.reading_time,
        category,
        url,
    }
}

/// GET /api/search.json?q=
///
/// Always answers 200; short queries and store failures give `[]`.
pub async fn search(state: web::Data<AppState>, query: web::Query<SearchQuery>) -> HttpResponse {
    let results: Vec<SearchResult> = state
        .articles
        .search(&query.q)
        .await
        .into_iter()
        .map(search_result)
        .collect();

    HttpResponse::Ok().json(results)
}

/// GET /api/articles.json?category=&limit=&offset=
pub async fn list_articles(
    state: web::Data<AppState>,
    query: web::Query<ListArticlesQuery>,
) -> AppResult<HttpResponse> {
    let ListArticlesQuery {
        category,
        limit,
        offset,
    } = query.into_inner();

    let articles = state
        .articles
        .list_published(category, limit, offset)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(ArticlesPayload { articles })))
}

/// GET /api/articles/{slug}.json
pub async fn get_article(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let article = state.articles.published_by_slug(&slug).await?;
    Ok(HttpResponse::Ok().json(ArticlePayload { article }))
}
