//! Application configuration loaded from environment variables.

use std::str::FromStr;

use uuid::Uuid;

use patrol_infra::DatabaseConfig;
use patrol_infra::auth::DEV_SECRET;

/// Settings for the hosted image bucket.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub base_url: String,
    pub service_key: String,
    pub bucket: String,
}

/// Admin session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_hours: i64,
    /// Mark the cookie `Secure`.
    pub cookie_secure: bool,
}

/// Super admin created at startup when missing.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub production: bool,
    pub database: Option<DatabaseConfig>,
    /// Shared secret expected in `X-API-Key`.
    pub ingest_api_key: Option<String>,
    pub default_author_id: Option<Uuid>,
    pub storage: Option<StorageSettings>,
    pub session: SessionConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let production = var("RUST_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production"));

        let database = var("DATABASE_URL").map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse(var("DB_MAX_CONNECTIONS")) {
                config.max_connections = max;
            }
            if let Some(min) = parse(var("DB_MIN_CONNECTIONS")) {
                config.min_connections = min;
            }
            config
        });

        let storage = match (var("STORAGE_URL"), var("STORAGE_SERVICE_KEY")) {
            (Some(base_url), Some(service_key)) => Some(StorageSettings {
                base_url,
                service_key,
                bucket: var("STORAGE_BUCKET").unwrap_or_else(|| "article-images".to_string()),
            }),
            _ => None,
        };

        let secret = var("SESSION_SECRET").unwrap_or_else(|| {
            if production {
                tracing::error!("SESSION_SECRET is not set in production; sessions use an insecure default");
            } else {
                tracing::warn!("SESSION_SECRET not set, using development secret");
            }
            DEV_SECRET.to_string()
        });

        let default_author_id = var("DEFAULT_AUTHOR_ID").and_then(|raw| {
            Uuid::parse_str(raw.trim())
                .inspect_err(|e| tracing::warn!(error = %e, "Ignoring invalid DEFAULT_AUTHOR_ID"))
                .ok()
        });

        let bootstrap_admin = match (var("BOOTSTRAP_ADMIN_EMAIL"), var("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            _ => None,
        };

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse(var("PORT")).unwrap_or(8080),
            production,
            database,
            ingest_api_key: var("INGEST_API_KEY"),
            default_author_id,
            storage,
            session: SessionConfig {
                secret,
                ttl_hours: parse(var("SESSION_TTL_HOURS")).unwrap_or(12),
                cookie_secure: parse(var("COOKIE_SECURE")).unwrap_or(production),
            },
            bootstrap_admin,
        }
    }
}

fn parse<T: FromStr>(raw: Option<String>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
impl AppConfig {
    /// In-memory configuration with a known API key and session secret.
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| match key {
            "INGEST_API_KEY" => Some("test-ingest-key".to_string()),
            "SESSION_SECRET" => Some("test-session-secret".to_string()),
            _ => None,
        })
    }
}
