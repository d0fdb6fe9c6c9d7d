//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;
mod storage;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use repository::{
    AdminRepository, ArticleQuery, ArticleRepository, AssociationUpdate, AuthorRepository,
    BaseRepository, CategoryRepository,
};
pub use storage::{ObjectStorage, StorageError, StoredObject};
