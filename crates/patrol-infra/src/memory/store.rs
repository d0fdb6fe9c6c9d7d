use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use patrol_core::domain::{
    Admin, Article, ArticleChanges, ArticleDetail, ArticleListing, ArticleStatus, Author,
    Category, DEFAULT_CATEGORIES, NewSource, Source,
};
use patrol_core::error::RepoError;
use patrol_core::ports::{
    AdminRepository, ArticleQuery, ArticleRepository, AssociationUpdate, AuthorRepository,
    BaseRepository, CategoryRepository,
};

/// Same name as the partial unique index the migration creates.
const APPROVED_SLUG_KEY: &str = "articles_approved_slug_key";

#[derive(Default)]
struct Tables {
    /// Insertion order; listings sort by `created_at`.
    articles: Vec<Article>,
    article_categories: Vec<(Uuid, i32)>,
    sources: Vec<Source>,
    next_source_id: i32,
    categories: BTreeMap<i32, Category>,
    next_category_id: i32,
    authors: Vec<Author>,
    admins: HashMap<Uuid, Admin>,
}

impl Tables {
    fn article(&self, id: Uuid) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    fn article_mut(&mut self, id: Uuid) -> Option<&mut Article> {
        self.articles.iter_mut().find(|a| a.id == id)
    }

    /// Another approved article already holds `slug`.
    fn approved_slug_taken(&self, slug: &str, exclude: Uuid) -> bool {
        self.articles
            .iter()
            .any(|a| a.id != exclude && a.slug == slug && a.status == ArticleStatus::Approved)
    }

    /// Linked categories ordered by id.
    fn categories_of(&self, article_id: Uuid) -> Vec<Category> {
        let mut ids: Vec<i32> = self
            .article_categories
            .iter()
            .filter(|(a, _)| *a == article_id)
            .map(|(_, c)| *c)
            .collect();
        ids.sort_unstable();

        ids.iter()
            .filter_map(|id| self.categories.get(id).cloned())
            .collect()
    }

    fn detail(&self, article: &Article) -> ArticleDetail {
        ArticleDetail {
            article: article.clone(),
            categories: self.categories_of(article.id),
            sources: self
                .sources
                .iter()
                .filter(|s| s.article_id == article.id)
                .cloned()
                .collect(),
        }
    }

    fn listing(&self, article: &Article) -> ArticleListing {
        ArticleListing {
            article: article.clone(),
            categories: self.categories_of(article.id),
        }
    }

    /// Newest first; ties go to the later insert.
    fn newest_first(&self) -> Vec<&Article> {
        let mut articles: Vec<&Article> = self.articles.iter().rev().collect();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        articles
    }

    fn link(&mut self, article_id: Uuid, category_ids: &[i32]) -> Result<(), RepoError> {
        if let Some(missing) = category_ids.iter().find(|id| !self.categories.contains_key(*id)) {
            return Err(RepoError::Constraint(format!(
                "category {missing} does not exist"
            )));
        }
        self.article_categories
            .extend(category_ids.iter().map(|&c| (article_id, c)));
        Ok(())
    }

    fn push_source(&mut self, article_id: Uuid, source: NewSource) -> Source {
        self.next_source_id += 1;
        let source = Source {
            id: self.next_source_id,
            article_id,
            name: source.name,
            url: source.url,
            source_type: source.source_type,
        };
        self.sources.push(source.clone());
        source
    }
}

/// In-memory store implementing every repository port.
///
/// Mirrors the database constraints that the services rely on: category
/// links must reference existing categories, admin emails are unique, and
/// only one approved article may hold a given slug.
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Store pre-filled with the site's default sections.
    pub async fn with_default_categories() -> Self {
        let store = Self::new();
        for (name, slug, description) in DEFAULT_CATEGORIES {
            store.seed_category(name, slug, Some(description)).await;
        }
        store
    }

    pub async fn seed_category(&self, name: &str, slug: &str, description: Option<&str>) -> Category {
        let mut tables = self.tables.write().await;
        tables.next_category_id += 1;
        let category = Category {
            id: tables.next_category_id,
            name: name.to_string(),
            slug: slug.to_string(),
            description: description.map(str::to_string),
        };
        tables.categories.insert(category.id, category.clone());
        category
    }

    pub async fn seed_author(&self, name: &str) -> Author {
        let author = Author {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            bio: None,
            avatar_url: None,
        };
        self.tables.write().await.authors.push(author.clone());
        author
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Admin, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, RepoError> {
        Ok(self.tables.read().await.admins.get(&id).cloned())
    }

    async fn insert(&self, entity: Admin) -> Result<Admin, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.admins.values().any(|a| a.email == entity.email) {
            return Err(RepoError::Constraint("admins_email_key".to_string()));
        }
        tables.admins.insert(entity.id, entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl AdminRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.admins.values().find(|a| a.email == email).cloned())
    }
}

#[async_trait]
impl AuthorRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Author>, RepoError> {
        let mut authors = self.tables.read().await.authors.clone();
        authors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(authors)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> =
            self.tables.read().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| tables.categories.contains_key(id))
            .collect())
    }
}

#[async_trait]
impl ArticleRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, RepoError> {
        Ok(self.tables.read().await.article(id).cloned())
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<ArticleDetail>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.article(id).map(|a| tables.detail(a)))
    }

    async fn insert(&self, article: Article, category_ids: &[i32]) -> Result<Article, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.article(article.id).is_some() {
            return Err(RepoError::Constraint("articles_pkey".to_string()));
        }
        tables.link(article.id, category_ids)?;
        tables.articles.push(article.clone());
        Ok(article)
    }

    async fn add_sources(
        &self,
        article_id: Uuid,
        sources: Vec<NewSource>,
    ) -> Result<Vec<Source>, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.article(article_id).is_none() {
            return Err(RepoError::Constraint(format!(
                "article {article_id} does not exist"
            )));
        }
        Ok(sources
            .into_iter()
            .map(|s| tables.push_source(article_id, s))
            .collect())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ArticleStatus,
        at: DateTime<Utc>,
    ) -> Result<Article, RepoError> {
        let mut tables = self.tables.write().await;
        let slug = tables.article(id).ok_or(RepoError::NotFound)?.slug.clone();

        if status == ArticleStatus::Approved && tables.approved_slug_taken(&slug, id) {
            return Err(RepoError::Constraint(APPROVED_SLUG_KEY.to_string()));
        }

        let article = tables.article_mut(id).ok_or(RepoError::NotFound)?;
        article.status = status;
        article.updated_at = at;
        Ok(article.clone())
    }

    async fn slug_taken_by_approved(&self, slug: &str, exclude: Uuid) -> Result<bool, RepoError> {
        Ok(self.tables.read().await.approved_slug_taken(slug, exclude))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ArticleChanges,
        associations: AssociationUpdate,
    ) -> Result<Article, RepoError> {
        let mut tables = self.tables.write().await;
        let status = tables.article(id).ok_or(RepoError::NotFound)?.status;

        // Validate before mutating anything so a failure leaves no partial write.
        if let Some(ids) = &associations.category_ids {
            if let Some(missing) = ids.iter().find(|c| !tables.categories.contains_key(*c)) {
                return Err(RepoError::Constraint(format!(
                    "category {missing} does not exist"
                )));
            }
        }

        if status == ArticleStatus::Approved && tables.approved_slug_taken(&changes.slug, id) {
            return Err(RepoError::Constraint(APPROVED_SLUG_KEY.to_string()));
        }

        if let Some(ids) = associations.category_ids {
            tables.article_categories.retain(|(a, _)| *a != id);
            tables.link(id, &ids)?;
        }
        if let Some(sources) = associations.sources {
            tables.sources.retain(|s| s.article_id != id);
            for source in sources {
                tables.push_source(id, source);
            }
        }

        let article = tables.article_mut(id).ok_or(RepoError::NotFound)?;
        article.title = changes.title;
        article.slug = changes.slug;
        article.excerpt = changes.excerpt;
        article.content = changes.content;
        article.cover_image_path = changes.cover_image_path;
        article.cover_image_alt = changes.cover_image_alt;
        article.updated_at = changes.updated_at;
        Ok(article.clone())
    }

    async fn delete_with_associations(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.articles.len();
        tables.articles.retain(|a| a.id != id);
        if tables.articles.len() == before {
            return Err(RepoError::NotFound);
        }

        tables.article_categories.retain(|(a, _)| *a != id);
        tables.sources.retain(|s| s.article_id != id);
        Ok(())
    }

    async fn list(&self, query: ArticleQuery) -> Result<Vec<ArticleListing>, RepoError> {
        let tables = self.tables.read().await;
        let category_id = match &query.category_slug {
            Some(slug) => match tables.categories.values().find(|c| &c.slug == slug) {
                Some(category) => Some(category.id),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        Ok(tables
            .newest_first()
            .into_iter()
            .filter(|a| query.status.is_none_or(|s| a.status == s))
            .filter(|a| {
                category_id.is_none_or(|c| tables.article_categories.contains(&(a.id, c)))
            })
            .skip(offset)
            .take(limit)
            .map(|a| tables.listing(a))
            .collect())
    }

    async fn search_published(
        &self,
        term: &str,
        limit: u64,
    ) -> Result<Vec<ArticleListing>, RepoError> {
        let tables = self.tables.read().await;
        let needle = term.to_lowercase();
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(tables
            .newest_first()
            .into_iter()
            .filter(|a| a.status == ArticleStatus::Approved)
            .filter(|a| {
                a.title.to_lowercase().contains(&needle)
                    || a
                        .excerpt
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&needle))
            })
            .take(limit)
            .map(|a| tables.listing(a))
            .collect())
    }

    async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ArticleDetail>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .articles
            .iter()
            .find(|a| a.slug == slug && a.status == ArticleStatus::Approved)
            .map(|a| tables.detail(a)))
    }
}
