//! # Patrol Infrastructure
//!
//! Concrete implementations of the ports defined in `patrol-core`.
//! This crate contains the database, authentication and object storage integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `storage` - Hosted object storage over HTTP

pub mod database;
pub mod memory;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, DatabaseConnections};
pub use memory::InMemoryStore;
pub use storage::InMemoryObjectStorage;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - External services
#[cfg(feature = "postgres")]
pub use database::{
    PostgresAdminRepository, PostgresArticleRepository, PostgresAuthorRepository,
    PostgresCategoryRepository,
};
#[cfg(feature = "storage")]
pub use storage::{StorageConfig, SupabaseStorage};
