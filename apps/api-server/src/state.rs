//! Application state - shared across all handlers.

use std::sync::Arc;

use patrol_core::DomainError;
use patrol_core::ports::{
    AdminRepository, ArticleRepository, AuthorRepository, CategoryRepository, ObjectStorage,
    PasswordService, TokenService,
};
use patrol_core::services::{AdminService, ArticleService, ArticleSettings};
use patrol_infra::{
    Argon2PasswordService, DatabaseConnections, InMemoryObjectStorage, InMemoryStore, JwtConfig,
    JwtTokenService,
};

#[cfg(feature = "postgres")]
use patrol_infra::{
    PostgresAdminRepository, PostgresArticleRepository, PostgresAuthorRepository,
    PostgresCategoryRepository,
};

use crate::config::{AppConfig, BootstrapAdmin};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub articles: Arc<ArticleService>,
    pub admins: Arc<AdminService>,
    pub categories: Arc<dyn CategoryRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

/// Repository set backing the services.
pub struct Repositories {
    pub articles: Arc<dyn ArticleRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub admins: Arc<dyn AdminRepository>,
}

impl Repositories {
    /// Every repository served by one in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            articles: store.clone(),
            categories: store.clone(),
            authors: store.clone(),
            admins: store,
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(connections: &DatabaseConnections) -> Self {
        let db = &connections.main;
        Self {
            articles: Arc::new(PostgresArticleRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            authors: Arc::new(PostgresAuthorRepository::new(db.clone())),
            admins: Arc::new(PostgresAdminRepository::new(db.clone())),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: AppConfig) -> Self {
        let (db, repositories) = Self::init_repositories(&config).await;
        let storage = Self::init_storage(&config);

        let state = Self::from_parts(
            config,
            repositories,
            storage,
            Arc::new(Argon2PasswordService::default()),
            db,
        );

        if let Some(bootstrap) = state.config.bootstrap_admin.clone() {
            state.ensure_bootstrap_admin(&bootstrap).await;
        }

        tracing::info!("Application state initialized");
        state
    }

    /// Wire services over the given backends.
    pub fn from_parts(
        config: AppConfig,
        repositories: Repositories,
        storage: Arc<dyn ObjectStorage>,
        passwords: Arc<dyn PasswordService>,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: config.session.secret.clone(),
            expiration_hours: config.session.ttl_hours,
            ..JwtConfig::default()
        }));

        let articles = ArticleService::new(
            repositories.articles,
            repositories.categories.clone(),
            storage,
            ArticleSettings {
                default_author_id: config.default_author_id,
                ..ArticleSettings::default()
            },
        );
        let admins = AdminService::new(repositories.admins, passwords);

        Self {
            config: Arc::new(config),
            articles: Arc::new(articles),
            admins: Arc::new(admins),
            categories: repositories.categories,
            authors: repositories.authors,
            tokens,
            db,
        }
    }

    async fn in_memory_repositories() -> Repositories {
        Repositories::in_memory(Arc::new(InMemoryStore::with_default_categories().await))
    }

    #[cfg(feature = "postgres")]
    async fn init_repositories(
        config: &AppConfig,
    ) -> (Option<Arc<DatabaseConnections>>, Repositories) {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (None, Self::in_memory_repositories().await);
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let repositories = Repositories::postgres(&connections);
                (Some(Arc::new(connections)), repositories)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (None, Self::in_memory_repositories().await)
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn init_repositories(
        _config: &AppConfig,
    ) -> (Option<Arc<DatabaseConnections>>, Repositories) {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        (None, Self::in_memory_repositories().await)
    }

    #[cfg(feature = "storage")]
    fn init_storage(config: &AppConfig) -> Arc<dyn ObjectStorage> {
        use patrol_infra::{StorageConfig, SupabaseStorage};

        let Some(settings) = config.storage.as_ref() else {
            tracing::warn!("STORAGE_URL not set. Uploaded images are kept in memory.");
            return Arc::new(InMemoryObjectStorage::default());
        };

        let storage_config = StorageConfig {
            base_url: settings.base_url.clone(),
            service_key: settings.service_key.clone(),
            bucket: settings.bucket.clone(),
            timeout: std::time::Duration::from_secs(30),
        };
        match SupabaseStorage::new(storage_config) {
            Ok(storage) => Arc::new(storage),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build storage client. Using in-memory fallback.");
                Arc::new(InMemoryObjectStorage::default())
            }
        }
    }

    #[cfg(not(feature = "storage"))]
    fn init_storage(_config: &AppConfig) -> Arc<dyn ObjectStorage> {
        tracing::info!("Running without storage feature - uploaded images are kept in memory");
        Arc::new(InMemoryObjectStorage::default())
    }

    /// Create the configured super admin unless the account already exists.
    async fn ensure_bootstrap_admin(&self, bootstrap: &BootstrapAdmin) {
        match self
            .admins
            .create(&bootstrap.email, &bootstrap.password, None, true)
            .await
        {
            Ok(admin) => tracing::info!(admin_id = %admin.id, "Bootstrap super admin created"),
            Err(DomainError::Duplicate(_)) => {
                tracing::debug!("Bootstrap super admin already exists")
            }
            Err(e) => tracing::error!(error = %e, "Failed to create bootstrap super admin"),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory state with the default categories, plus the store for seeding.
    pub async fn for_tests() -> (Self, Arc<InMemoryStore>, Arc<InMemoryObjectStorage>) {
        let store = Arc::new(InMemoryStore::with_default_categories().await);
        let storage = Arc::new(InMemoryObjectStorage::default());
        let state = Self::from_parts(
            AppConfig::for_tests(),
            Repositories::in_memory(store.clone()),
            storage.clone(),
            Arc::new(Argon2PasswordService::default()),
            None,
        );
        (state, store, storage)
    }
}
