//! Object storage port - where uploaded cover images end up.

use async_trait::async_trait;

/// Location of an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Path inside the bucket.
    pub path: String,
    /// Publicly reachable URL of the object.
    pub public_url: String,
}

/// Object storage trait - abstraction over storage backends.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload bytes under `path`. Existing objects are never overwritten.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;
}

/// Storage operation errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage request failed: {0}")]
    Request(String),

    #[error("Storage rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Object already exists: {0}")]
    AlreadyExists(String),
}
