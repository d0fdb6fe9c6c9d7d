//! HTTP handlers and route configuration.

mod admin_articles;
mod admin_auth;
mod form;
mod health;
mod ingest;
mod public;


use actix_web::{HttpRequest, error, web};

use crate::middleware::error::AppError;

/// Largest JSON body accepted by the ingestion endpoint.
const JSON_LIMIT: usize = 4 * 1024 * 1024;

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Malformed {
        error: "Invalid JSON",
        details: err.to_string(),
    }
    .into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Malformed {
        error: "Invalid query parameters",
        details: err.to_string(),
    }
    .into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Malformed {
        error: "Invalid path parameter",
        details: err.to_string(),
    }
    .into()
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(json_error),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error))
    .app_data(web::PathConfig::default().error_handler(path_error))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/categories/list.json", web::get().to(public::list_categories))
            .route("/authors/list.json", web::get().to(public::list_authors))
            .route("/search.json", web::get().to(public::search))
            .route("/articles.json", web::get().to(public::list_articles))
            // Registered before the slug route so "create" is never read as a slug.
            .route("/articles/create.json", web::post().to(ingest::create_article))
            .route("/articles/{slug}.json", web::get().to(public::get_article)),
    )
    .service(
        web::scope("/admin/api")
            .route("/login", web::post().to(admin_auth::login))
            .route("/logout", web::post().to(admin_auth::logout))
            .route("/session", web::get().to(admin_auth::current_session))
            .route("/create-admin.json", web::post().to(admin_auth::create_admin))
            .service(
                web::resource("/articles.json")
                    .route(web::get().to(admin_articles::list_articles))
                    .route(web::post().to(admin_articles::create_article)),
            )
            .service(
                web::resource("/articles/{id}.json")
                    .route(web::get().to(admin_articles::get_article))
                    .route(web::put().to(admin_articles::update_article))
                    .route(web::patch().to(admin_articles::transition_article)),
            ),
    );
}
