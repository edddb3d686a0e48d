/// Object storage layer
///
/// Key-addressed blob storage for uploaded media. Handlers only ever write;
/// each object carries a content-type tag recorded at upload time.
///
/// Writes are create-only: putting an existing key fails with
/// [`StorageError::AlreadyExists`] instead of replacing the object.

pub mod local;
pub mod memory;

pub use local::LocalObjectStore;
pub use memory::{MemoryObjectStore, StoredObject};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors raised by object store backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid object key: {0:?}")]
    InvalidKey(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata encoding error: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Per-object options supplied with a put
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    /// Declared MIME type of the payload
    pub content_type: String,
}

/// What the store records about an object besides its bytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub key: String,
    pub content_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl ObjectMetadata {
    fn new(key: &str, body: &[u8], options: PutOptions) -> Self {
        Self {
            key: key.to_string(),
            content_type: options.content_type,
            size: body.len() as u64,
            uploaded_at: Utc::now(),
        }
    }
}

/// Object store binding
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// Store `body` under `key`, failing if the key is already taken
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        options: PutOptions,
    ) -> Result<ObjectMetadata, StorageError>;

    /// Confirm the backend can currently accept writes
    async fn health_check(&self) -> Result<(), StorageError>;

    /// Short backend name for diagnostics
    fn backend(&self) -> &'static str;
}
