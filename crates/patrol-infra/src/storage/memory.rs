//! In-memory object storage - used when no storage service is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use patrol_core::ports::{ObjectStorage, StorageError, StoredObject};

struct StoredBlob {
    content_type: String,
    bytes: Vec<u8>,
}

/// Keeps uploads in a map. Data is lost on process restart.
pub struct InMemoryObjectStorage {
    public_base: String,
    objects: RwLock<HashMap<String, StoredBlob>>,
}

impl InMemoryObjectStorage {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Content type and size of a stored object.
    pub async fn metadata(&self, path: &str) -> Option<(String, usize)> {
        let objects = self.objects.read().await;
        objects
            .get(path)
            .map(|blob| (blob.content_type.clone(), blob.bytes.len()))
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new("/uploads")
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let mut objects = self.objects.write().await;
        if objects.contains_key(path) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }

        objects.insert(
            path.to_string(),
            StoredBlob {
                content_type: content_type.to_string(),
                bytes,
            },
        );

        Ok(StoredObject {
            path: path.to_string(),
            public_url: format!("{}/{}", self.public_base, path),
        })
    }
}
