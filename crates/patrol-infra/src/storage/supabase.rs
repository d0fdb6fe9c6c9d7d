//! Storage client for the Supabase storage REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};

use patrol_core::ports::{ObjectStorage, StorageError, StoredObject};

/// Connection settings for the storage service.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Service key sent as bearer token.
    pub service_key: String,
    pub bucket: String,
    pub timeout: Duration,
}

impl StorageConfig {
    pub const DEFAULT_BUCKET: &'static str = "article-images";
}

/// Uploads objects into a single bucket.
pub struct SupabaseStorage {
    client: Client,
    config: StorageConfig,
}

impl SupabaseStorage {
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::Request(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base(), self.config.bucket, path)
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base(),
            self.config.bucket,
            path
        )
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        tracing::debug!(bucket = %self.config.bucket, path, size = bytes.len(), "Uploading object");

        let response = self
            .client
            .post(self.object_url(path))
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(StoredObject {
                path: path.to_string(),
                public_url: self.public_url(path),
            });
        }

        let message = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }

        tracing::error!(status = status.as_u16(), %message, "Storage upload rejected");
        Err(StorageError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
