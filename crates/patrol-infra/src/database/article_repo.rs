//! PostgreSQL article repository.
//!
//! Writes touching more than one table run inside a single transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, EntityTrait,
    IntoActiveModel, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set, TransactionTrait,
};
use uuid::Uuid;

use patrol_core::domain::{
    Article, ArticleChanges, ArticleDetail, ArticleListing, ArticleStatus, Category, NewSource,
    Source,
};
use patrol_core::error::RepoError;
use patrol_core::ports::{ArticleQuery, ArticleRepository, AssociationUpdate};

use super::entity::article::{self, Entity as ArticleEntity};
use super::entity::article_category::{self, Entity as ArticleCategoryEntity};
use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::source::{self, Entity as SourceEntity};
use super::postgres_base::map_db_err;

/// PostgreSQL article repository.
pub struct PostgresArticleRepository {
    db: DbConn,
}

impl PostgresArticleRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Escape LIKE wildcards so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

async fn categories_for<C>(db: &C, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Category>>, RepoError>
where
    C: ConnectionTrait,
{
    let mut grouped: HashMap<Uuid, Vec<Category>> = HashMap::new();
    if ids.is_empty() {
        return Ok(grouped);
    }

    let links = ArticleCategoryEntity::find()
        .filter(article_category::Column::ArticleId.is_in(ids.to_vec()))
        .find_also_related(CategoryEntity)
        .order_by_asc(article_category::Column::CategoryId)
        .all(db)
        .await
        .map_err(map_db_err)?;

    for (link, category) in links {
        if let Some(category) = category {
            grouped
                .entry(link.article_id)
                .or_default()
                .push(category.into());
        }
    }

    Ok(grouped)
}

async fn load_detail<C>(db: &C, model: article::Model) -> Result<ArticleDetail, RepoError>
where
    C: ConnectionTrait,
{
    let id = model.id;
    let categories = categories_for(db, &[id])
        .await?
        .remove(&id)
        .unwrap_or_default();

    let sources = SourceEntity::find()
        .filter(source::Column::ArticleId.eq(id))
        .order_by_asc(source::Column::Id)
        .all(db)
        .await
        .map_err(map_db_err)?;

    Ok(ArticleDetail {
        article: Article::try_from(model)?,
        categories,
        sources: sources.into_iter().map(Into::into).collect(),
    })
}

async fn listings<C>(db: &C, models: Vec<article::Model>) -> Result<Vec<ArticleListing>, RepoError>
where
    C: ConnectionTrait,
{
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut categories = categories_for(db, &ids).await?;

    let mut result = Vec::with_capacity(models.len());
    for model in models {
        let categories = categories.remove(&model.id).unwrap_or_default();
        result.push(ArticleListing {
            article: Article::try_from(model)?,
            categories,
        });
    }

    Ok(result)
}

async fn link_categories<C>(db: &C, article_id: Uuid, category_ids: &[i32]) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    if category_ids.is_empty() {
        return Ok(());
    }

    let links = category_ids.iter().map(|&category_id| article_category::ActiveModel {
        article_id: Set(article_id),
        category_id: Set(category_id),
    });

    ArticleCategoryEntity::insert_many(links)
        .exec_without_returning(db)
        .await
        .map_err(map_db_err)?;

    Ok(())
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, RepoError> {
        let result = ArticleEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        result.map(Article::try_from).transpose()
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<ArticleDetail>, RepoError> {
        let Some(model) = ArticleEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        load_detail(&self.db, model).await.map(Some)
    }

    async fn insert(&self, article: Article, category_ids: &[i32]) -> Result<Article, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let active_model: article::ActiveModel = article.into();
        let model = active_model.insert(&txn).await.map_err(map_db_err)?;
        link_categories(&txn, model.id, category_ids).await?;

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(article_id = %model.id, categories = category_ids.len(), "Article inserted");

        model.try_into()
    }

    async fn add_sources(
        &self,
        article_id: Uuid,
        sources: Vec<NewSource>,
    ) -> Result<Vec<Source>, RepoError> {
        let mut saved = Vec::with_capacity(sources.len());
        for new_source in sources {
            let model = source::new_active_model(article_id, new_source)
                .insert(&self.db)
                .await
                .map_err(map_db_err)?;
            saved.push(model.into());
        }

        Ok(saved)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ArticleStatus,
        at: DateTime<Utc>,
    ) -> Result<Article, RepoError> {
        let model = ArticleEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active_model = model.into_active_model();
        active_model.status = Set(status.as_str().to_string());
        active_model.updated_at = Set(at.into());

        // Approving a duplicate slug trips the partial unique index.
        let updated = active_model.update(&self.db).await.map_err(map_db_err)?;
        updated.try_into()
    }

    async fn slug_taken_by_approved(&self, slug: &str, exclude: Uuid) -> Result<bool, RepoError> {
        let count = ArticleEntity::find()
            .filter(article::Column::Slug.eq(slug))
            .filter(article::Column::Status.eq(ArticleStatus::Approved.as_str()))
            .filter(article::Column::Id.ne(exclude))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ArticleChanges,
        associations: AssociationUpdate,
    ) -> Result<Article, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = ArticleEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active_model = model.into_active_model();
        active_model.title = Set(changes.title);
        active_model.slug = Set(changes.slug);
        active_model.excerpt = Set(changes.excerpt);
        active_model.content = Set(changes.content);
        active_model.cover_image_path = Set(changes.cover_image_path);
        active_model.cover_image_alt = Set(changes.cover_image_alt);
        active_model.updated_at = Set(changes.updated_at.into());
        let updated = active_model.update(&txn).await.map_err(map_db_err)?;

        if let Some(category_ids) = associations.category_ids {
            ArticleCategoryEntity::delete_many()
                .filter(article_category::Column::ArticleId.eq(id))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
            link_categories(&txn, id, &category_ids).await?;
        }

        if let Some(sources) = associations.sources {
            SourceEntity::delete_many()
                .filter(source::Column::ArticleId.eq(id))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
            if !sources.is_empty() {
                let rows = sources
                    .into_iter()
                    .map(|s| source::new_active_model(id, s));
                SourceEntity::insert_many(rows)
                    .exec_without_returning(&txn)
                    .await
                    .map_err(map_db_err)?;
            }
        }

        txn.commit().await.map_err(map_db_err)?;
        updated.try_into()
    }

    async fn delete_with_associations(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        ArticleCategoryEntity::delete_many()
            .filter(article_category::Column::ArticleId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        SourceEntity::delete_many()
            .filter(source::Column::ArticleId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        let result = ArticleEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }

    async fn list(&self, query: ArticleQuery) -> Result<Vec<ArticleListing>, RepoError> {
        let mut select = ArticleEntity::find();

        if let Some(status) = query.status {
            select = select.filter(article::Column::Status.eq(status.as_str()));
        }
        if let Some(slug) = query.category_slug {
            select = select
                .join(JoinType::InnerJoin, article::Relation::ArticleCategory.def())
                .join(JoinType::InnerJoin, article_category::Relation::Category.def())
                .filter(category::Column::Slug.eq(slug));
        }

        let mut select = select
            .order_by_desc(article::Column::CreatedAt)
            .offset(query.offset);
        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }

        let models = select.all(&self.db).await.map_err(map_db_err)?;
        listings(&self.db, models).await
    }

    async fn search_published(
        &self,
        term: &str,
        limit: u64,
    ) -> Result<Vec<ArticleListing>, RepoError> {
        let pattern = like_pattern(term);
        let matches = |column: article::Column| {
            Expr::expr(Func::lower(Expr::col((ArticleEntity, column))))
                .like(LikeExpr::new(pattern.clone()).escape('\\'))
        };

        let models = ArticleEntity::find()
            .filter(article::Column::Status.eq(ArticleStatus::Approved.as_str()))
            .filter(
                Condition::any()
                    .add(matches(article::Column::Title))
                    .add(matches(article::Column::Excerpt)),
            )
            .order_by_desc(article::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        listings(&self.db, models).await
    }

    async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ArticleDetail>, RepoError> {
        let Some(model) = ArticleEntity::find()
            .filter(article::Column::Slug.eq(slug))
            .filter(article::Column::Status.eq(ArticleStatus::Approved.as_str()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        load_detail(&self.db, model).await.map(Some)
    }
}
