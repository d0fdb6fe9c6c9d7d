//! Article service - lifecycle transitions, ingestion, admin edits and reads.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::text;
use crate::domain::{
    Article, ArticleChanges, ArticleDetail, ArticleListing, ArticleStatus, NewArticle,
    NewSource,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{
    ArticleQuery, ArticleRepository, AssociationUpdate, CategoryRepository, ObjectStorage,
};

use super::inputs::{CoverImage, CreateArticle, IngestArticle, UpdateArticle};
use super::lifecycle::{LifecycleAction, TransitionOutcome};

/// Shortest search term that reaches the store.
pub const MIN_SEARCH_LEN: usize = 2;

pub const SLUG_CONFLICT: &str = "Slug must be unique among approved articles";

/// Tunables for [`ArticleService`].
#[derive(Debug, Clone)]
pub struct ArticleSettings {
    /// Author credited when ingestion does not name one.
    pub default_author_id: Option<Uuid>,
    pub search_limit: u64,
    pub max_page_size: u64,
    pub default_page_size: u64,
}

impl Default for ArticleSettings {
    fn default() -> Self {
        Self {
            default_author_id: None,
            search_limit: 10,
            max_page_size: 50,
            default_page_size: 20,
        }
    }
}

pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    categories: Arc<dyn CategoryRepository>,
    storage: Arc<dyn ObjectStorage>,
    settings: ArticleSettings,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ArticleService {
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        categories: Arc<dyn CategoryRepository>,
        storage: Arc<dyn ObjectStorage>,
        settings: ArticleSettings,
    ) -> Self {
        Self {
            articles,
            categories,
            storage,
            settings,
        }
    }

    /// Apply a moderation action. Nothing is written when a precondition fails.
    pub async fn transition(
        &self,
        id: Uuid,
        action: LifecycleAction,
    ) -> Result<TransitionOutcome, DomainError> {
        tracing::debug!(article_id = %id, ?action, "Applying lifecycle action");

        match action {
            LifecycleAction::Approve => self.approve(id).await.map(TransitionOutcome::Updated),
            LifecycleAction::Reject | LifecycleAction::Unpublish => {
                let status = action
                    .target_status()
                    .ok_or_else(|| DomainError::Internal("action has no target status".into()))?;
                let article = self
                    .articles
                    .set_status(id, status, Utc::now())
                    .await
                    .map_err(|e| article_error(e, id))?;
                tracing::info!(article_id = %id, status = %status, "Article status changed");
                Ok(TransitionOutcome::Updated(article))
            }
            LifecycleAction::Delete => {
                self.articles
                    .delete_with_associations(id)
                    .await
                    .map_err(|e| article_error(e, id))?;
                tracing::info!(article_id = %id, "Article deleted");
                Ok(TransitionOutcome::Deleted)
            }
        }
    }

    async fn approve(&self, id: Uuid) -> Result<Article, DomainError> {
        let article = self
            .articles
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Article", id))?;

        if let Some(field) = article.missing_for_approval() {
            return Err(DomainError::Validation(format!(
                "Article {field} is required for approval"
            )));
        }

        if self.articles.slug_taken_by_approved(&article.slug, id).await? {
            return Err(DomainError::Conflict(SLUG_CONFLICT.to_string()));
        }

        // The store re-checks the slug, so a concurrent approval still ends as a conflict.
        let approved = self
            .articles
            .set_status(id, ArticleStatus::Approved, Utc::now())
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) => DomainError::Conflict(SLUG_CONFLICT.to_string()),
                other => article_error(other, id),
            })?;

        tracing::info!(article_id = %id, slug = %approved.slug, "Article approved");
        Ok(approved)
    }

    /// Create a draft from the ingestion endpoint.
    pub async fn ingest(&self, input: IngestArticle) -> Result<ArticleDetail, DomainError> {
        let title = non_blank(input.title);
        let content = non_blank(input.content);

        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if content.is_none() {
            missing.push("content");
        }
        let (Some(title), Some(content)) = (title, content) else {
            return Err(DomainError::MissingFields(missing));
        };

        self.ensure_categories_exist(&input.category_ids).await?;

        let slug = non_blank(input.slug).unwrap_or_else(|| text::slugify(&title));
        let excerpt = non_blank(input.excerpt).unwrap_or_else(|| text::derive_excerpt(&content));
        let reading_time = input
            .reading_time
            .filter(|minutes| *minutes > 0)
            .or_else(|| i32::try_from(text::reading_time(&content)).ok())
            .filter(|minutes| *minutes > 0);

        let article = Article::new(NewArticle {
            cover_image_alt: non_blank(input.cover_image_alt).or_else(|| Some(title.clone())),
            title,
            slug,
            excerpt: Some(excerpt),
            content,
            status: ArticleStatus::Draft,
            cover_image_path: non_blank(input.cover_image_path),
            reading_time,
            author_id: input.author_id.or(self.settings.default_author_id),
        });

        let category_ids = dedup(&input.category_ids);
        let article = self.articles.insert(article, &category_ids).await?;
        tracing::info!(article_id = %article.id, slug = %article.slug, "Draft article ingested");

        self.attach_sources(article.id, input.sources).await;

        match self.articles.find_detail(article.id).await? {
            Some(detail) => Ok(detail),
            None => Err(DomainError::not_found("Article", article.id)),
        }
    }

    /// Create a pending article from the admin form.
    pub async fn create(&self, input: CreateArticle) -> Result<Article, DomainError> {
        let title = input.title.trim();
        let excerpt = input.excerpt.trim();
        let content = input.content.trim();
        if title.is_empty() || excerpt.is_empty() || content.is_empty() {
            return Err(DomainError::Validation(
                "Title, excerpt, and content are required".to_string(),
            ));
        }
        if let Some(CoverImage::Upload(upload)) = &input.cover {
            upload.validate()?;
        }
        self.ensure_categories_exist(&input.category_ids).await?;

        let cover_image_path = self.store_cover(input.cover).await?;

        let article = Article::new(NewArticle {
            title: title.to_string(),
            slug: text::slugify(title),
            excerpt: Some(excerpt.to_string()),
            content: content.to_string(),
            status: ArticleStatus::Pending,
            cover_image_path,
            cover_image_alt: non_blank(input.cover_image_alt),
            reading_time: i32::try_from(text::reading_time(content))
                .ok()
                .filter(|minutes| *minutes > 0),
            author_id: None,
        });

        let article = self
            .articles
            .insert(article, &dedup(&input.category_ids))
            .await?;
        tracing::info!(article_id = %article.id, "Pending article created");

        if let Some(source) = input.source.filter(|s| s.url.is_some()) {
            self.attach_sources(article.id, vec![source]).await;
        }

        Ok(article)
    }

    /// Overwrite an article from the admin form. Status is left as is.
    pub async fn update(&self, id: Uuid, input: UpdateArticle) -> Result<Article, DomainError> {
        let title = input.title.trim();
        let slug = input.slug.trim();
        let excerpt = input.excerpt.as_deref().map(str::trim).unwrap_or_default();
        let content = input.content.trim();
        if title.is_empty() || slug.is_empty() || excerpt.is_empty() || content.is_empty() {
            return Err(DomainError::Validation(
                "Title, slug, description, and content are required".to_string(),
            ));
        }
        if let Some(CoverImage::Upload(upload)) = &input.cover {
            upload.validate()?;
        }
        if let Some(ids) = &input.category_ids {
            self.ensure_categories_exist(ids).await?;
        }

        // Checked before the upload so a missing article leaves no orphaned object.
        let current = self
            .articles
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Article", id))?;

        if current.status == ArticleStatus::Approved
            && self.articles.slug_taken_by_approved(slug, id).await?
        {
            return Err(DomainError::Conflict(SLUG_CONFLICT.to_string()));
        }

        let cover_image_path = self.store_cover(input.cover).await?;

        let changes = ArticleChanges {
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: Some(excerpt.to_string()),
            content: content.to_string(),
            cover_image_path,
            cover_image_alt: None,
            updated_at: Utc::now(),
        };
        let associations = AssociationUpdate {
            category_ids: input.category_ids.as_deref().map(dedup),
            sources: input.sources,
        };

        let article = self
            .articles
            .update(id, changes, associations)
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) => DomainError::Conflict(SLUG_CONFLICT.to_string()),
                other => article_error(other, id),
            })?;
        tracing::info!(article_id = %id, "Article updated");
        Ok(article)
    }

    /// Article with associations, any status.
    pub async fn detail(&self, id: Uuid) -> Result<ArticleDetail, DomainError> {
        self.articles
            .find_detail(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Article", id))
    }

    /// Moderation listing, optionally filtered by status.
    pub async fn list_for_review(
        &self,
        status: Option<ArticleStatus>,
    ) -> Result<Vec<ArticleListing>, DomainError> {
        let query = ArticleQuery {
            status,
            category_slug: None,
            limit: None,
            offset: 0,
        };
        Ok(self.articles.list(query).await?)
    }

    /// Approved articles, newest first.
    pub async fn list_published(
        &self,
        category_slug: Option<String>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<ArticleListing>, DomainError> {
        let limit = limit
            .unwrap_or(self.settings.default_page_size)
            .clamp(1, self.settings.max_page_size);
        let query = ArticleQuery {
            status: Some(ArticleStatus::Approved),
            category_slug: non_blank(category_slug),
            limit: Some(limit),
            offset: offset.unwrap_or(0),
        };
        Ok(self.articles.list(query).await?)
    }

    pub async fn published_by_slug(&self, slug: &str) -> Result<ArticleDetail, DomainError> {
        self.articles
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Article", slug))
    }

    /// Search approved articles. Short terms and store failures yield no results.
    pub async fn search(&self, query: &str) -> Vec<ArticleListing> {
        let term = query.trim();
        if term.chars().count() < MIN_SEARCH_LEN {
            return Vec::new();
        }

        match self
            .articles
            .search_published(term, self.settings.search_limit)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(error = %e, "Search query failed");
                Vec::new()
            }
        }
    }

    async fn ensure_categories_exist(&self, ids: &[i32]) -> Result<(), DomainError> {
        let wanted = dedup(ids);
        if wanted.is_empty() {
            return Ok(());
        }

        let existing: BTreeSet<i32> = self
            .categories
            .existing_ids(&wanted)
            .await?
            .into_iter()
            .collect();
        let unknown: Vec<String> = wanted
            .iter()
            .filter(|id| !existing.contains(id))
            .map(ToString::to_string)
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "Unknown category ids: {}",
                unknown.join(", ")
            )))
        }
    }

    async fn store_cover(&self, cover: Option<CoverImage>) -> Result<Option<String>, DomainError> {
        match cover {
            None => Ok(None),
            Some(CoverImage::Url(url)) => Ok(non_blank(Some(url)).map(|u| u.trim().to_string())),
            Some(CoverImage::Upload(upload)) => {
                let name = upload.object_name();
                let stored = self
                    .storage
                    .upload(&name, upload.bytes, &upload.content_type)
                    .await?;
                tracing::info!(path = %stored.path, "Cover image uploaded");
                Ok(Some(stored.public_url))
            }
        }
    }

    /// Sources are secondary: a failure is logged and the article is kept.
    async fn attach_sources(&self, article_id: Uuid, sources: Vec<NewSource>) {
        if sources.is_empty() {
            return;
        }
        if let Err(e) = self.articles.add_sources(article_id, sources).await {
            tracing::warn!(article_id = %article_id, error = %e, "Failed to attach sources");
        }
    }
}

fn article_error(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("Article", id),
        other => DomainError::Repository(other),
    }
}

fn dedup(ids: &[i32]) -> Vec<i32> {
    let mut seen = BTreeSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
