use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use patrol_core::DomainError;
use patrol_core::domain::{
    Article, ArticleChanges, ArticleDetail, ArticleListing, ArticleStatus, NewArticle, NewSource,
    Source,
};
use patrol_core::error::RepoError;
use patrol_core::ports::{
    ArticleQuery, ArticleRepository, AssociationUpdate, AuthError, CategoryRepository,
    PasswordService,
};
use patrol_core::services::{
    AdminService, ArticleService, ArticleSettings, CoverImage, CreateArticle, ImageUpload,
    IngestArticle, LifecycleAction, SLUG_CONFLICT, TransitionOutcome, UpdateArticle,
};

use super::InMemoryStore;
use crate::storage::InMemoryObjectStorage;

struct Harness {
    store: Arc<InMemoryStore>,
    storage: Arc<InMemoryObjectStorage>,
    service: ArticleService,
}

async fn harness_with(settings: ArticleSettings) -> Harness {
    let store = Arc::new(InMemoryStore::with_default_categories().await);
    let storage = Arc::new(InMemoryObjectStorage::default());
    let service = ArticleService::new(store.clone(), store.clone(), storage.clone(), settings);
    Harness {
        store,
        storage,
        service,
    }
}

async fn harness() -> Harness {
    harness_with(ArticleSettings::default()).await
}

fn ingest(title: &str) -> IngestArticle {
    IngestArticle {
        title: Some(title.to_string()),
        content: Some(format!("<p>{title} body</p>")),
        ..Default::default()
    }
}

/// Insert an article directly, bypassing the service defaults.
async fn seed_article(
    store: &InMemoryStore,
    slug: &str,
    status: ArticleStatus,
    excerpt: Option<&str>,
    age_minutes: i64,
) -> Article {
    let mut article = Article::new(NewArticle {
        title: format!("Title {slug}"),
        slug: slug.to_string(),
        excerpt: excerpt.map(str::to_string),
        content: "Body".to_string(),
        status,
        cover_image_path: None,
        cover_image_alt: None,
        reading_time: Some(1),
        author_id: None,
    });
    article.created_at = Utc::now() - Duration::minutes(age_minutes);
    ArticleRepository::insert(store, article, &[]).await.unwrap()
}

fn png(size: usize) -> CoverImage {
    CoverImage::Upload(ImageUpload {
        file_name: "cover.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![1; size],
    })
}

#[tokio::test]
async fn test_ingest_reports_every_missing_field() {
    let h = harness().await;

    let err = h
        .service
        .ingest(IngestArticle {
            title: Some("   ".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::MissingFields(ref f) if f == &["title", "content"]));
    assert_eq!(err.to_string(), "Missing required fields: title, content");
}

#[tokio::test]
async fn test_ingest_derives_defaults() {
    let author_id = Uuid::new_v4();
    let h = harness_with(ArticleSettings {
        default_author_id: Some(author_id),
        ..Default::default()
    })
    .await;

    let content = format!("<p>{}</p>", "mot ".repeat(250));
    let detail = h
        .service
        .ingest(IngestArticle {
            title: Some("Éléphant à l'écran!".to_string()),
            content: Some(content),
            category_ids: vec![2, 1, 2],
            sources: vec![NewSource::from_raw(Some("Le Monde"), Some("https://lemonde.fr"), None)],
            ..Default::default()
        })
        .await
        .unwrap();

    let article = &detail.article;
    assert_eq!(article.status, ArticleStatus::Draft);
    assert_eq!(article.slug, "elephant-a-l-ecran");
    assert_eq!(article.reading_time, Some(2));
    assert_eq!(article.cover_image_alt.as_deref(), Some("Éléphant à l'écran!"));
    assert_eq!(article.author_id, Some(author_id));
    let excerpt = article.excerpt.as_deref().unwrap();
    assert!(excerpt.ends_with("..."));
    assert!(!excerpt.contains('<'));

    let category_ids: Vec<i32> = detail.categories.iter().map(|c| c.id).collect();
    assert_eq!(category_ids, vec![1, 2]);
    assert_eq!(detail.sources.len(), 1);
    assert_eq!(detail.sources[0].source_type, "web");
}

#[tokio::test]
async fn test_ingest_keeps_explicit_values() {
    let h = harness().await;
    let author_id = Uuid::new_v4();

    let detail = h
        .service
        .ingest(IngestArticle {
            slug: Some("custom-slug".to_string()),
            excerpt: Some("Hand written".to_string()),
            reading_time: Some(7),
            cover_image_alt: Some("Alt".to_string()),
            author_id: Some(author_id),
            ..ingest("Some title")
        })
        .await
        .unwrap();

    assert_eq!(detail.article.slug, "custom-slug");
    assert_eq!(detail.article.excerpt.as_deref(), Some("Hand written"));
    assert_eq!(detail.article.reading_time, Some(7));
    assert_eq!(detail.article.cover_image_alt.as_deref(), Some("Alt"));
    assert_eq!(detail.article.author_id, Some(author_id));
}

#[tokio::test]
async fn test_ingest_rejects_unknown_category_without_writing() {
    let h = harness().await;

    let err = h
        .service
        .ingest(IngestArticle {
            category_ids: vec![1, 99],
            ..ingest("Orphan")
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(ref msg) if msg == "Unknown category ids: 99"));
    assert!(h.service.list_for_review(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_approve_requires_excerpt() {
    let h = harness().await;
    let article = seed_article(&h.store, "no-excerpt", ArticleStatus::Pending, None, 0).await;

    let err = h
        .service
        .transition(article.id, LifecycleAction::Approve)
        .await
        .unwrap_err();

    assert!(
        matches!(err, DomainError::Validation(ref msg) if msg == "Article excerpt is required for approval")
    );
    let unchanged = h.service.detail(article.id).await.unwrap();
    assert_eq!(unchanged.article.status, ArticleStatus::Pending);
}

async fn seed_blank_field(store: &InMemoryStore, slug: &str, title: &str, content: &str) -> Article {
    let article = Article::new(NewArticle {
        title: title.to_string(),
        slug: slug.to_string(),
        excerpt: Some("E".to_string()),
        content: content.to_string(),
        status: ArticleStatus::Pending,
        cover_image_path: None,
        cover_image_alt: None,
        reading_time: Some(1),
        author_id: None,
    });
    ArticleRepository::insert(store, article, &[]).await.unwrap()
}

#[tokio::test]
async fn test_approve_requires_non_blank_title() {
    let h = harness().await;
    let article = seed_blank_field(&h.store, "blank-title", "   ", "Body").await;

    let err = h
        .service
        .transition(article.id, LifecycleAction::Approve)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(ref msg) if msg == "Article title is required for approval"));
    let unchanged = h.service.detail(article.id).await.unwrap();
    assert_eq!(unchanged.article.status, ArticleStatus::Pending);
}

#[tokio::test]
async fn test_approve_requires_non_blank_content() {
    let h = harness().await;
    let article = seed_blank_field(&h.store, "blank-content", "Title", " \n\t ").await;

    let err = h
        .service
        .transition(article.id, LifecycleAction::Approve)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(ref msg) if msg == "Article content is required for approval"));
    let unchanged = h.service.detail(article.id).await.unwrap();
    assert_eq!(unchanged.article.status, ArticleStatus::Pending);
}

#[tokio::test]
async fn test_approve_publishes_article() {
    let h = harness().await;
    let detail = h.service.ingest(ingest("Fresh news")).await.unwrap();
    let before = detail.article.updated_at;

    let outcome = h
        .service
        .transition(detail.article.id, LifecycleAction::Approve)
        .await
        .unwrap();

    let TransitionOutcome::Updated(article) = outcome else {
        panic!("expected an updated article");
    };
    assert_eq!(article.status, ArticleStatus::Approved);
    assert!(article.updated_at >= before);

    let published = h.service.published_by_slug("fresh-news").await.unwrap();
    assert_eq!(published.article.id, article.id);
}

#[tokio::test]
async fn test_approve_rejects_duplicate_slug() {
    let h = harness().await;
    seed_article(&h.store, "same", ArticleStatus::Approved, Some("E"), 5).await;
    let second = seed_article(&h.store, "same", ArticleStatus::Pending, Some("E"), 0).await;

    let err = h
        .service
        .transition(second.id, LifecycleAction::Approve)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict(ref msg) if msg == SLUG_CONFLICT));
    let unchanged = h.service.detail(second.id).await.unwrap();
    assert_eq!(unchanged.article.status, ArticleStatus::Pending);
}

#[tokio::test]
async fn test_store_enforces_unique_approved_slug() {
    let store = InMemoryStore::new();
    seed_article(&store, "same", ArticleStatus::Approved, Some("E"), 0).await;
    let second = seed_article(&store, "same", ArticleStatus::Pending, Some("E"), 0).await;

    let result = store
        .set_status(second.id, ArticleStatus::Approved, Utc::now())
        .await;
    assert!(matches!(result, Err(RepoError::Constraint(_))));

    // Other transitions are unaffected by the slug rule.
    let rejected = store
        .set_status(second.id, ArticleStatus::Rejected, Utc::now())
        .await
        .unwrap();
    assert_eq!(rejected.status, ArticleStatus::Rejected);
}

#[tokio::test]
async fn test_reapproving_same_article_is_allowed() {
    let h = harness().await;
    let article = seed_article(&h.store, "solo", ArticleStatus::Approved, Some("E"), 0).await;

    let outcome = h
        .service
        .transition(article.id, LifecycleAction::Approve)
        .await
        .unwrap();
    assert!(matches!(outcome, TransitionOutcome::Updated(a) if a.status == ArticleStatus::Approved));
}

#[tokio::test]
async fn test_reject_and_unpublish() {
    let h = harness().await;
    let article = seed_article(&h.store, "moving", ArticleStatus::Approved, Some("E"), 0).await;

    let outcome = h
        .service
        .transition(article.id, LifecycleAction::Unpublish)
        .await
        .unwrap();
    assert!(matches!(outcome, TransitionOutcome::Updated(ref a) if a.status == ArticleStatus::Pending));

    let outcome = h
        .service
        .transition(article.id, LifecycleAction::Reject)
        .await
        .unwrap();
    assert!(matches!(outcome, TransitionOutcome::Updated(ref a) if a.status == ArticleStatus::Rejected));

    assert!(matches!(
        h.service.published_by_slug("moving").await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_unpublish_returns_rejected_article_to_review() {
    let h = harness().await;
    let article = seed_article(&h.store, "second-look", ArticleStatus::Rejected, Some("E"), 0).await;
    let before = h.service.detail(article.id).await.unwrap().article.updated_at;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let outcome = h
        .service
        .transition(article.id, LifecycleAction::Unpublish)
        .await
        .unwrap();

    let TransitionOutcome::Updated(updated) = outcome else {
        panic!("expected an updated article");
    };
    assert_eq!(updated.status, ArticleStatus::Pending);
    assert!(updated.updated_at > before);

    let stored = h.service.detail(article.id).await.unwrap();
    assert_eq!(stored.article.status, ArticleStatus::Pending);
}

#[tokio::test]
async fn test_delete_removes_article_and_associations() {
    let h = harness().await;
    let detail = h
        .service
        .ingest(IngestArticle {
            category_ids: vec![1],
            sources: vec![NewSource::from_raw(None, Some("https://x.io"), Some("twitter"))],
            ..ingest("Doomed")
        })
        .await
        .unwrap();
    let id = detail.article.id;

    let outcome = h.service.transition(id, LifecycleAction::Delete).await.unwrap();
    assert!(matches!(outcome, TransitionOutcome::Deleted));

    assert!(matches!(
        h.service.detail(id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(h.store.find_detail(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_transition_on_missing_article() {
    let h = harness().await;

    for action in [
        LifecycleAction::Approve,
        LifecycleAction::Reject,
        LifecycleAction::Unpublish,
        LifecycleAction::Delete,
    ] {
        let err = h.service.transition(Uuid::new_v4(), action).await.unwrap_err();
        assert!(
            matches!(err, DomainError::NotFound { entity_type: "Article", .. }),
            "{action:?}"
        );
    }
}

#[tokio::test]
async fn test_search_filters_and_limits() {
    let h = harness_with(ArticleSettings {
        search_limit: 2,
        ..Default::default()
    })
    .await;
    seed_article(&h.store, "rust-one", ArticleStatus::Approved, Some("About RUST"), 3).await;
    seed_article(&h.store, "rust-two", ArticleStatus::Approved, Some("rust again"), 2).await;
    seed_article(&h.store, "rust-three", ArticleStatus::Approved, Some("Rust thrice"), 1).await;
    seed_article(&h.store, "rust-draft", ArticleStatus::Draft, Some("rust draft"), 0).await;

    assert!(h.service.search("r").await.is_empty());
    assert!(h.service.search("  r  ").await.is_empty());

    let results = h.service.search("RuSt").await;
    let slugs: Vec<&str> = results.iter().map(|r| r.article.slug.as_str()).collect();
    assert_eq!(slugs, vec!["rust-three", "rust-two"]);
}

#[tokio::test]
async fn test_search_matches_title_only_articles() {
    let h = harness().await;
    seed_article(&h.store, "no-excerpt", ArticleStatus::Approved, None, 0).await;

    // Titles are "Title {slug}".
    let results = h.service.search("title no-ex").await;
    assert_eq!(results.len(), 1);
}

/// Delegates to the store and counts `search_published` calls.
struct CountingSearch {
    inner: Arc<InMemoryStore>,
    searches: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl ArticleRepository for CountingSearch {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, RepoError> {
        ArticleRepository::find_by_id(self.inner.as_ref(), id).await
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<ArticleDetail>, RepoError> {
        self.inner.find_detail(id).await
    }

    async fn insert(&self, article: Article, category_ids: &[i32]) -> Result<Article, RepoError> {
        ArticleRepository::insert(self.inner.as_ref(), article, category_ids).await
    }

    async fn add_sources(
        &self,
        article_id: Uuid,
        sources: Vec<NewSource>,
    ) -> Result<Vec<Source>, RepoError> {
        self.inner.add_sources(article_id, sources).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ArticleStatus,
        at: DateTime<Utc>,
    ) -> Result<Article, RepoError> {
        self.inner.set_status(id, status, at).await
    }

    async fn slug_taken_by_approved(&self, slug: &str, exclude: Uuid) -> Result<bool, RepoError> {
        self.inner.slug_taken_by_approved(slug, exclude).await
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ArticleChanges,
        associations: AssociationUpdate,
    ) -> Result<Article, RepoError> {
        self.inner.update(id, changes, associations).await
    }

    async fn delete_with_associations(&self, id: Uuid) -> Result<(), RepoError> {
        self.inner.delete_with_associations(id).await
    }

    async fn list(&self, query: ArticleQuery) -> Result<Vec<ArticleListing>, RepoError> {
        ArticleRepository::list(self.inner.as_ref(), query).await
    }

    async fn search_published(
        &self,
        term: &str,
        limit: u64,
    ) -> Result<Vec<ArticleListing>, RepoError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RepoError::Query("search unavailable".to_string()));
        }
        self.inner.search_published(term, limit).await
    }

    async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ArticleDetail>, RepoError> {
        self.inner.find_published_by_slug(slug).await
    }
}

async fn counting_service(fail: bool) -> (Arc<CountingSearch>, ArticleService) {
    let store = Arc::new(InMemoryStore::with_default_categories().await);
    seed_article(&store, "rust-one", ArticleStatus::Approved, Some("About rust"), 0).await;
    let articles = Arc::new(CountingSearch {
        inner: store.clone(),
        searches: AtomicUsize::new(0),
        fail,
    });
    let service = ArticleService::new(
        articles.clone(),
        store,
        Arc::new(InMemoryObjectStorage::default()),
        ArticleSettings::default(),
    );
    (articles, service)
}

#[tokio::test]
async fn test_short_search_never_reaches_store() {
    let (articles, service) = counting_service(false).await;

    assert!(service.search("a").await.is_empty());
    assert!(service.search("  r  ").await.is_empty());
    assert!(service.search("").await.is_empty());
    assert_eq!(articles.searches.load(Ordering::SeqCst), 0);

    assert_eq!(service.search("ru").await.len(), 1);
    assert_eq!(articles.searches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_search_failure_yields_empty_results() {
    let (articles, service) = counting_service(true).await;

    assert!(service.search("rust").await.is_empty());
    assert_eq!(articles.searches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_list_published_by_category_with_paging() {
    let h = harness().await;
    for (i, title) in ["One", "Two", "Three"].iter().enumerate() {
        let detail = h
            .service
            .ingest(IngestArticle {
                category_ids: vec![2],
                ..ingest(title)
            })
            .await
            .unwrap();
        h.service
            .transition(detail.article.id, LifecycleAction::Approve)
            .await
            .unwrap();
        assert_eq!(detail.categories[0].slug, "mobile", "article {i}");
    }
    h.service.ingest(ingest("Unapproved")).await.unwrap();

    let all = h
        .service
        .list_published(Some("mobile".to_string()), None, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|l| l.public_path().starts_with("/mobile/")));

    let page = h
        .service
        .list_published(Some("mobile".to_string()), Some(1), Some(1))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].article.id, all[1].article.id);

    let none = h
        .service
        .list_published(Some("unknown".to_string()), None, None)
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_list_published_clamps_limit() {
    let h = harness_with(ArticleSettings {
        max_page_size: 2,
        ..Default::default()
    })
    .await;
    for (i, slug) in ["a", "b", "c"].iter().enumerate() {
        seed_article(&h.store, slug, ArticleStatus::Approved, Some("E"), i as i64).await;
    }

    let listing = h.service.list_published(None, Some(500), None).await.unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].article.slug, "a");

    let listing = h.service.list_published(None, Some(0), None).await.unwrap();
    assert_eq!(listing.len(), 1);
}

#[tokio::test]
async fn test_list_for_review_filters_status() {
    let h = harness().await;
    seed_article(&h.store, "p", ArticleStatus::Pending, Some("E"), 0).await;
    seed_article(&h.store, "d", ArticleStatus::Draft, Some("E"), 0).await;

    let pending = h
        .service
        .list_for_review(Some(ArticleStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].article.slug, "p");
    assert_eq!(h.service.list_for_review(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_requires_fields() {
    let h = harness().await;

    let err = h
        .service
        .create(CreateArticle {
            title: "Title".to_string(),
            excerpt: " ".to_string(),
            content: "Body".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(
        matches!(err, DomainError::Validation(ref msg) if msg == "Title, excerpt, and content are required")
    );
}

#[tokio::test]
async fn test_create_uploads_cover_and_attaches_source() {
    let h = harness().await;

    let article = h
        .service
        .create(CreateArticle {
            title: "Nouvelle puce".to_string(),
            excerpt: "Court".to_string(),
            content: "Long".to_string(),
            cover: Some(png(128)),
            cover_image_alt: Some("Puce".to_string()),
            category_ids: vec![3],
            source: Some(NewSource::from_raw(Some("Blog"), Some("https://blog.io"), None)),
        })
        .await
        .unwrap();

    assert_eq!(article.status, ArticleStatus::Pending);
    assert_eq!(article.slug, "nouvelle-puce");
    let cover = article.cover_image_path.as_deref().unwrap();
    assert!(cover.starts_with("/uploads/") && cover.ends_with(".png"));
    let path = cover.trim_start_matches("/uploads/");
    assert_eq!(
        h.storage.metadata(path).await,
        Some(("image/png".to_string(), 128))
    );

    let detail = h.service.detail(article.id).await.unwrap();
    assert_eq!(detail.categories[0].slug, "tech");
    assert_eq!(detail.sources.len(), 1);
}

#[tokio::test]
async fn test_create_skips_source_without_url() {
    let h = harness().await;

    let article = h
        .service
        .create(CreateArticle {
            title: "T".to_string(),
            excerpt: "E".to_string(),
            content: "C".to_string(),
            source: Some(NewSource::from_raw(Some("Name only"), None, None)),
            ..Default::default()
        })
        .await
        .unwrap();

    let detail = h.service.detail(article.id).await.unwrap();
    assert!(detail.sources.is_empty());
}

#[tokio::test]
async fn test_create_rejects_bad_upload_before_storing() {
    let h = harness().await;

    let err = h
        .service
        .create(CreateArticle {
            title: "T".to_string(),
            excerpt: "E".to_string(),
            content: "C".to_string(),
            cover: Some(CoverImage::Upload(ImageUpload {
                file_name: "notes.txt".to_string(),
                content_type: "text/plain".to_string(),
                bytes: vec![0; 10],
            })),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(ref msg) if msg == "Unsupported file type"));
    assert!(h.storage.is_empty().await);
    assert!(h.service.list_for_review(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_replaces_supplied_associations_only() {
    let h = harness().await;
    let detail = h
        .service
        .ingest(IngestArticle {
            category_ids: vec![1, 2],
            sources: vec![NewSource::from_raw(None, Some("https://old.io"), None)],
            cover_image_path: Some("https://img/old.png".to_string()),
            ..ingest("Before")
        })
        .await
        .unwrap();
    let id = detail.article.id;

    let updated = h
        .service
        .update(
            id,
            UpdateArticle {
                title: "After".to_string(),
                slug: "after".to_string(),
                excerpt: Some("New excerpt".to_string()),
                content: "New body".to_string(),
                category_ids: Some(vec![3]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "After");
    assert_eq!(updated.status, ArticleStatus::Draft);
    assert_eq!(updated.cover_image_path, None);

    let detail = h.service.detail(id).await.unwrap();
    let category_ids: Vec<i32> = detail.categories.iter().map(|c| c.id).collect();
    assert_eq!(category_ids, vec![3]);
    assert_eq!(detail.sources.len(), 1, "sources untouched when not supplied");

    h.service
        .update(
            id,
            UpdateArticle {
                title: "After".to_string(),
                slug: "after".to_string(),
                excerpt: Some("New excerpt".to_string()),
                content: "New body".to_string(),
                cover: Some(CoverImage::Url("https://img/new.png".to_string())),
                sources: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let detail = h.service.detail(id).await.unwrap();
    assert!(detail.sources.is_empty());
    assert_eq!(detail.categories.len(), 1);
    assert_eq!(
        detail.article.cover_image_path.as_deref(),
        Some("https://img/new.png")
    );
}

#[tokio::test]
async fn test_update_missing_article_uploads_nothing() {
    let h = harness().await;

    let err = h
        .service
        .update(
            Uuid::new_v4(),
            UpdateArticle {
                title: "T".to_string(),
                slug: "t".to_string(),
                excerpt: Some("E".to_string()),
                content: "C".to_string(),
                cover: Some(png(16)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { .. }));
    assert!(h.storage.is_empty().await);
}

#[tokio::test]
async fn test_update_requires_fields() {
    let h = harness().await;
    let article = seed_article(&h.store, "x", ArticleStatus::Draft, None, 0).await;

    let err = h
        .service
        .update(
            article.id,
            UpdateArticle {
                title: "T".to_string(),
                content: "C".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(
        matches!(err, DomainError::Validation(ref msg) if msg == "Title, slug, description, and content are required")
    );
}

#[tokio::test]
async fn test_update_requires_description() {
    let h = harness().await;
    let article = seed_article(&h.store, "keep", ArticleStatus::Draft, Some("Old"), 0).await;

    for excerpt in [None, Some("   ".to_string())] {
        let err = h
            .service
            .update(
                article.id,
                UpdateArticle {
                    title: "New title".to_string(),
                    slug: "keep".to_string(),
                    excerpt,
                    content: "New body".to_string(),
                    cover: Some(png(16)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(
            matches!(err, DomainError::Validation(ref msg) if msg == "Title, slug, description, and content are required")
        );
    }

    let unchanged = h.service.detail(article.id).await.unwrap();
    assert_eq!(unchanged.article.title, "Title keep");
    assert_eq!(unchanged.article.excerpt.as_deref(), Some("Old"));
    assert!(h.storage.is_empty().await);
}

fn rename(slug: &str) -> UpdateArticle {
    UpdateArticle {
        title: "Renamed".to_string(),
        slug: slug.to_string(),
        excerpt: Some("E".to_string()),
        content: "Body".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_update_rejects_slug_of_other_approved_article() {
    let h = harness().await;
    seed_article(&h.store, "taken", ArticleStatus::Approved, Some("E"), 5).await;
    let other = seed_article(&h.store, "other", ArticleStatus::Approved, Some("E"), 0).await;

    let err = h.service.update(other.id, rename("taken")).await.unwrap_err();

    assert!(matches!(err, DomainError::Conflict(ref msg) if msg == SLUG_CONFLICT));
    let unchanged = h.service.detail(other.id).await.unwrap();
    assert_eq!(unchanged.article.slug, "other");
    assert_eq!(unchanged.article.title, "Title other");

    // Keeping its own slug is fine.
    let renamed = h.service.update(other.id, rename("other")).await.unwrap();
    assert_eq!(renamed.title, "Renamed");
}

#[tokio::test]
async fn test_update_allows_taken_slug_on_unapproved_article() {
    let h = harness().await;
    seed_article(&h.store, "taken", ArticleStatus::Approved, Some("E"), 5).await;
    let draft = seed_article(&h.store, "draft", ArticleStatus::Draft, Some("E"), 0).await;

    let updated = h.service.update(draft.id, rename("taken")).await.unwrap();
    assert_eq!(updated.slug, "taken");

    // Approving it later still hits the slug rule.
    let err = h
        .service
        .transition(draft.id, LifecycleAction::Approve)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ref msg) if msg == SLUG_CONFLICT));
}

#[tokio::test]
async fn test_store_update_enforces_unique_approved_slug() {
    let store = InMemoryStore::new();
    seed_article(&store, "taken", ArticleStatus::Approved, Some("E"), 0).await;
    let other = seed_article(&store, "other", ArticleStatus::Approved, Some("E"), 0).await;

    let changes = ArticleChanges {
        title: "Renamed".to_string(),
        slug: "taken".to_string(),
        excerpt: Some("E".to_string()),
        content: "Body".to_string(),
        cover_image_path: None,
        cover_image_alt: None,
        updated_at: Utc::now(),
    };
    let result = store
        .update(other.id, changes, AssociationUpdate::default())
        .await;
    assert!(matches!(result, Err(RepoError::Constraint(_))));

    let stored = ArticleRepository::find_by_id(&store, other.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.slug, "other");
}

#[tokio::test]
async fn test_default_categories_seeded() {
    let store = InMemoryStore::with_default_categories().await;
    let categories = CategoryRepository::list(&store).await.unwrap();
    let slugs: Vec<&str> = categories.iter().map(|c| c.slug.as_str()).collect();
    assert_eq!(slugs, vec!["ia", "mobile", "tech"]);
}

/// Reversible "hash" so admin tests do not pay for Argon2.
struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain:{password}"))
    }
}

fn admin_service() -> AdminService {
    AdminService::new(Arc::new(InMemoryStore::new()), Arc::new(PlainPasswords))
}

#[tokio::test]
async fn test_admin_create_and_login() {
    let service = admin_service();

    let admin = service
        .create("Editor@GeeksPatrol.test", "s3cret-pass", None, false)
        .await
        .unwrap();
    assert_eq!(admin.email, "editor@geekspatrol.test");
    assert_eq!(admin.full_name, "editor@geekspatrol.test");
    assert!(admin.is_active);

    let logged_in = service
        .login(" EDITOR@geekspatrol.test ", "s3cret-pass")
        .await
        .unwrap();
    assert_eq!(logged_in.id, admin.id);
    assert_eq!(service.get(admin.id).await.unwrap().email, admin.email);
}

#[tokio::test]
async fn test_admin_login_failures_are_uniform() {
    let service = admin_service();
    service
        .create("editor@geekspatrol.test", "s3cret-pass", Some("Ed"), false)
        .await
        .unwrap();

    assert!(matches!(
        service.login("editor@geekspatrol.test", "wrong-pass").await,
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        service.login("nobody@geekspatrol.test", "s3cret-pass").await,
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        service.login("", "").await,
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn test_admin_create_validation() {
    let service = admin_service();

    assert!(matches!(
        service.create("not-an-email", "s3cret-pass", None, false).await,
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        service.create("a@b.c", "short", None, false).await,
        Err(DomainError::Validation(_))
    ));

    service.create("a@b.c", "long-enough", None, true).await.unwrap();
    assert!(matches!(
        service.create("A@B.C", "long-enough", None, false).await,
        Err(DomainError::Duplicate(_))
    ));
}
