/// In-process object store
///
/// Objects live in a map behind a tokio `RwLock`. Nothing survives a restart;
/// useful for ephemeral deployments and for asserting on uploads in tests.

use crate::storage::{ObjectMetadata, ObjectStore, PutOptions, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A stored payload and its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub metadata: ObjectMetadata,
}

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a copy of an object
    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        options: PutOptions,
    ) -> Result<ObjectMetadata, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let mut objects = self.objects.write().await;
        if objects.contains_key(key) {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }

        let metadata = ObjectMetadata::new(key, &body, options);
        objects.insert(
            key.to_string(),
            StoredObject {
                body,
                metadata: metadata.clone(),
            },
        );

        tracing::debug!("Stored {} bytes in memory under {}", metadata.size, key);
        Ok(metadata)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
