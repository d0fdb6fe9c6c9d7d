//! PostgreSQL repository implementations for admins, authors and categories.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use patrol_core::domain::{Admin, Author, Category};
use patrol_core::error::RepoError;
use patrol_core::ports::{AdminRepository, AuthorRepository, CategoryRepository};

use super::entity::admin::{self, Entity as AdminEntity};
use super::entity::author::{self, Entity as AuthorEntity};
use super::entity::category::{self, Entity as CategoryEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL admin repository.
pub type PostgresAdminRepository = PostgresBaseRepository<AdminEntity>;

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// Keep only the first character of the local part, so logs carry no PII.
pub(crate) fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl AdminRepository for PostgresAdminRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, RepoError> {
        tracing::debug!(admin_email = %mask_email(email), "Finding admin by email");

        let result = AdminEntity::find()
            .filter(admin::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn list(&self) -> Result<Vec<Author>, RepoError> {
        let result = AuthorEntity::find()
            .order_by_asc(author::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        CategoryEntity::find()
            .select_only()
            .column(category::Column::Id)
            .filter(category::Column::Id.is_in(ids.to_vec()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}
