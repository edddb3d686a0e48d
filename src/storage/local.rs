/// Filesystem object store
///
/// Layout under the root directory:
/// - objects/{file name}: raw payload
/// - meta/{file name}.json: ObjectMetadata sidecar
/// - tmp/: staging area for writes in progress
///
/// Keys are stored verbatim in the metadata; only the on-disk file name is
/// derived from the key, so separators and dot segments in a key never leave
/// the root and long keys never exceed the filesystem's name limit.
///
/// A put stages payload and sidecar under unique names, then claims the key
/// by hard-linking the payload into `objects/`. A failed put leaves neither a
/// payload nor a sidecar behind.

use crate::storage::{ObjectMetadata, ObjectStore, PutOptions, StorageError};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const OBJECTS_DIR: &str = "objects";
const META_DIR: &str = "meta";
const TMP_DIR: &str = "tmp";

/// Longest escaped key used as a file name as-is
const MAX_PLAIN_NAME: usize = 160;
/// Escaped prefix kept in front of the hash for longer keys
const HASHED_PREFIX_LEN: usize = 96;

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Open a store rooted at `root`, creating its directories when missing
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        for dir in [OBJECTS_DIR, META_DIR, TMP_DIR] {
            tokio::fs::create_dir_all(root.join(dir)).await?;
        }

        tracing::info!("📁 Object store ready at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the payload file for `key`
    pub fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(OBJECTS_DIR).join(file_name_for(key))
    }

    /// Path of the metadata sidecar for `key`
    pub fn metadata_path(&self, key: &str) -> PathBuf {
        self.root
            .join(META_DIR)
            .join(format!("{}.json", file_name_for(key)))
    }

    /// Move staged files into place
    ///
    /// The hard link fails when the payload name is taken, which makes the
    /// claim create-only. If the sidecar cannot be placed the claim is undone.
    async fn commit(
        &self,
        key: &str,
        staged_body: &Path,
        staged_meta: &Path,
        body: &[u8],
        metadata: &ObjectMetadata,
    ) -> Result<(), StorageError> {
        tokio::fs::write(staged_body, body).await?;
        tokio::fs::write(staged_meta, serde_json::to_vec_pretty(metadata)?).await?;

        let object_path = self.object_path(key);
        match tokio::fs::hard_link(staged_body, &object_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        if let Err(e) = tokio::fs::rename(staged_meta, self.metadata_path(key)).await {
            remove_if_present(&object_path).await;
            return Err(e.into());
        }

        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        options: PutOptions,
    ) -> Result<ObjectMetadata, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let metadata = ObjectMetadata::new(key, &body, options);

        let staged_body = self.root.join(TMP_DIR).join(Uuid::new_v4().to_string());
        let staged_meta = staged_body.with_extension("json");
        let result = self
            .commit(key, &staged_body, &staged_meta, &body, &metadata)
            .await;

        // The payload stays reachable through its hard link in objects/
        remove_if_present(&staged_body).await;
        remove_if_present(&staged_meta).await;
        result?;

        tracing::debug!(
            "Stored {} bytes under {} ({})",
            metadata.size,
            key,
            self.object_path(key).display()
        );
        Ok(metadata)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        let objects = tokio::fs::metadata(self.root.join(OBJECTS_DIR)).await?;
        if !objects.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                ErrorKind::NotFound,
                "objects directory is missing",
            )));
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

async fn remove_if_present(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
    }
}

/// On-disk file name for `key`
///
/// Short keys map to their escaped form. Longer ones keep an escaped prefix
/// for readability and end in `~` plus the SHA-256 of the key. Escaped names
/// never contain `~`, so the two forms cannot collide.
fn file_name_for(key: &str) -> String {
    let escaped = escape_key(key);
    if escaped.len() <= MAX_PLAIN_NAME {
        return escaped;
    }

    let mut cut = HASHED_PREFIX_LEN;
    if let Some(pos) = escaped[..cut].rfind('%') {
        if pos + 3 > cut {
            cut = pos;
        }
    }
    format!(
        "{}~{}",
        &escaped[..cut],
        hex::encode(Sha256::digest(key.as_bytes()))
    )
}

/// Map a key to a single safe file name
///
/// Every byte outside `[A-Za-z0-9._-]` becomes `%XX`, and so does a leading
/// dot, which keeps `.` and `..` from naming directories. The mapping is
/// injective, so distinct keys never share a file.
fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for (i, byte) in key.bytes().enumerate() {
        let plain = byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.');
        if plain && !(i == 0 && byte == b'.') {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("%{:02X}", byte));
        }
    }
    escaped
}
