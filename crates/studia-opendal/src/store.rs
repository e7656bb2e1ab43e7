//! File store implementation.

use opendal::{Operator, services};

use crate::TRACING_TARGET;
use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};

/// File store backed by an OpenDAL operator.
///
/// Cheap to clone; all clones share the same underlying operator.
#[derive(Clone)]
pub struct FileStore {
    operator: Operator,
    config: StorageConfig,
}

impl FileStore {
    /// Creates a new file store from configuration.
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        let builder = services::Fs::default().root(&config.storage_root);
        let operator = Operator::new(builder)
            .map(|op| op.finish())
            .map_err(|e| StorageError::init(e.to_string()))?;

        tracing::info!(
            target: TRACING_TARGET,
            root = %config.storage_root,
            "file store initialized"
        );

        Ok(Self { operator, config })
    }

    /// Returns the configuration for this store.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Reads an object from storage.
    pub async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let data = self.operator.read(key).await?.to_vec();

        tracing::debug!(
            target: TRACING_TARGET,
            key = %key,
            size = data.len(),
            "object read"
        );

        Ok(data)
    }

    /// Writes data to an object, replacing any previous content.
    pub async fn write(&self, key: &str, data: Vec<u8>) -> StorageResult<()> {
        let size = data.len();
        self.operator.write(key, data).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            key = %key,
            size,
            "object written"
        );

        Ok(())
    }

    /// Deletes an object. Deleting a missing object is not an error.
    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        self.operator.delete(key).await?;

        tracing::debug!(target: TRACING_TARGET, key = %key, "object deleted");

        Ok(())
    }

    /// Checks whether an object exists.
    pub async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.operator.exists(key).await?)
    }

    /// Returns metadata for an object.
    pub async fn stat(&self, key: &str) -> StorageResult<ObjectMetadata> {
        let meta = self.operator.stat(key).await?;

        let last_modified = meta
            .last_modified()
            .and_then(|dt| jiff::Timestamp::from_second(dt.timestamp()).ok());

        Ok(ObjectMetadata {
            size: meta.content_length(),
            last_modified,
            content_type: meta.content_type().map(|s| s.to_string()),
        })
    }

    /// Lists object keys under the given prefix.
    ///
    /// Directory placeholder entries are filtered out; only file objects are
    /// returned.
    pub async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        use futures::TryStreamExt;

        let entries: Vec<_> = self.operator.lister(prefix).await?.try_collect().await?;

        Ok(entries
            .into_iter()
            .map(|e| e.path().to_string())
            .filter(|path| !path.ends_with('/'))
            .collect())
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("root", &self.config.storage_root)
            .finish()
    }
}

/// Object metadata.
#[derive(Debug, Clone)]
pub struct ObjectMetadata {
    /// Object size in bytes.
    pub size: u64,
    /// Last modification time.
    pub last_modified: Option<jiff::Timestamp>,
    /// Content type / MIME type, when the backend records one.
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(StorageConfig::new(dir.path().to_string_lossy()))
            .expect("file store");
        (dir, store)
    }

    #[tokio::test]
    async fn write_read_delete_roundtrip() {
        let (_dir, store) = temp_store();

        store
            .write("uploads/a.png", b"image-bytes".to_vec())
            .await
            .expect("write");

        assert!(store.exists("uploads/a.png").await.expect("exists"));
        let data = store.read("uploads/a.png").await.expect("read");
        assert_eq!(data, b"image-bytes");

        store.delete("uploads/a.png").await.expect("delete");
        assert!(!store.exists("uploads/a.png").await.expect("exists"));
    }

    #[tokio::test]
    async fn read_missing_object_is_not_found() {
        let (_dir, store) = temp_store();

        let err = store.read("uploads/missing.png").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_returns_only_files_under_prefix() {
        let (_dir, store) = temp_store();

        store.write("exports/a.pdf", vec![1]).await.expect("write");
        store.write("exports/b.pdf", vec![2]).await.expect("write");
        store.write("uploads/c.png", vec![3]).await.expect("write");

        let mut keys = store.list("exports/").await.expect("list");
        keys.sort();
        assert_eq!(keys, vec!["exports/a.pdf", "exports/b.pdf"]);
    }

    #[tokio::test]
    async fn stat_reports_size_and_mtime() {
        let (_dir, store) = temp_store();

        store
            .write("exports/report.pdf", vec![0u8; 128])
            .await
            .expect("write");

        let meta = store.stat("exports/report.pdf").await.expect("stat");
        assert_eq!(meta.size, 128);
        assert!(meta.last_modified.is_some());
    }
}
