//! Database connection management and PostgreSQL repositories.

mod connections;

#[cfg(feature = "postgres")]
mod article_repo;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
pub use article_repo::PostgresArticleRepository;
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresAdminRepository, PostgresAuthorRepository, PostgresCategoryRepository,
};
