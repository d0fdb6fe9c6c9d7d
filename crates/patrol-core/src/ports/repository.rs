use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Admin, Article, ArticleChanges, ArticleDetail, ArticleListing, ArticleStatus, Author,
    Category, NewSource, Source,
};
use crate::error::RepoError;

/// Generic repository trait for entities addressed by a primary key.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// Admin repository with domain-specific methods.
#[async_trait]
pub trait AdminRepository: BaseRepository<Admin, Uuid> {
    /// Find an admin by (lower-cased) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, RepoError>;
}

/// Author repository.
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// All authors ordered by name.
    async fn list(&self) -> Result<Vec<Author>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;

    /// The subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, RepoError>;
}

/// Filter for article listings.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    pub status: Option<ArticleStatus>,
    pub category_slug: Option<String>,
    /// `None` returns every match.
    pub limit: Option<u64>,
    pub offset: u64,
}

/// Association replacement applied together with an article overwrite.
/// `None` leaves the existing rows untouched.
#[derive(Debug, Clone, Default)]
pub struct AssociationUpdate {
    pub category_ids: Option<Vec<i32>>,
    pub sources: Option<Vec<NewSource>>,
}

/// Article repository.
///
/// Methods that touch several tables (`insert`, `update`,
/// `delete_with_associations`) must apply atomically when the backend allows it.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, RepoError>;

    /// Article with its categories and sources.
    async fn find_detail(&self, id: Uuid) -> Result<Option<ArticleDetail>, RepoError>;

    /// Insert an article and link it to `category_ids`.
    async fn insert(&self, article: Article, category_ids: &[i32]) -> Result<Article, RepoError>;

    /// Attach sources to an existing article.
    async fn add_sources(
        &self,
        article_id: Uuid,
        sources: Vec<NewSource>,
    ) -> Result<Vec<Source>, RepoError>;

    /// Set the status and stamp `updated_at`. `RepoError::NotFound` if missing,
    /// `RepoError::Constraint` if approving would duplicate an approved slug.
    async fn set_status(
        &self,
        id: Uuid,
        status: ArticleStatus,
        at: DateTime<Utc>,
    ) -> Result<Article, RepoError>;

    /// Whether an approved article other than `exclude` already uses `slug`.
    async fn slug_taken_by_approved(&self, slug: &str, exclude: Uuid) -> Result<bool, RepoError>;

    /// Overwrite the editable columns and replace associations (delete then reinsert).
    async fn update(
        &self,
        id: Uuid,
        changes: ArticleChanges,
        associations: AssociationUpdate,
    ) -> Result<Article, RepoError>;

    /// Remove category links, sources and the article row.
    async fn delete_with_associations(&self, id: Uuid) -> Result<(), RepoError>;

    /// Articles newest first.
    async fn list(&self, query: ArticleQuery) -> Result<Vec<ArticleListing>, RepoError>;

    /// Approved articles whose title or excerpt contains `term` (case-insensitive), newest first.
    async fn search_published(
        &self,
        term: &str,
        limit: u64,
    ) -> Result<Vec<ArticleListing>, RepoError>;

    async fn find_published_by_slug(&self, slug: &str)
    -> Result<Option<ArticleDetail>, RepoError>;
}
