//! Local filesystem storage
//!
//! Stores every file directly in one flat directory. Writes go to a
//! `.part`-suffixed temporary name and are renamed into place, so a file is
//! only visible under its final name once it is complete; abandoned `.part`
//! files age out through the retention sweep like any other entry.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::traits::{ByteStream, Storage, StorageEntry, StorageError, StorageResult};

#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Open (and create if absent) the storage directory. Safe to call on
    /// every startup.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a storage name to its on-disk path.
    ///
    /// The namespace is flat, so a valid name is exactly one normal path
    /// component: separators and the dot components are rejected. A ".."
    /// appearing inside a longer name (e.g. "a..b.png") is harmless.
    fn name_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
            || name.contains('\0')
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.base_path.join(name))
    }

    /// Recreate the namespace directory if something removed it at runtime.
    async fn ensure_base_dir(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, name: &str, data: Vec<u8>) -> StorageResult<()> {
        let path = self.name_to_path(name)?;
        let tmp_path = self.base_path.join(format!("{name}.part"));
        let size = data.len();

        self.ensure_base_dir().await?;

        let mut file = fs::File::create(&tmp_path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create {}: {}", tmp_path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync {}: {}", tmp_path.display(), e))
        })?;

        fs::rename(&tmp_path, &path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to move {} into place: {}",
                tmp_path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            "Stored file"
        );

        Ok(())
    }

    async fn open_stream(&self, name: &str) -> StorageResult<ByteStream> {
        let path = self.name_to_path(name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let reader = tokio_util::io::ReaderStream::new(file);
        let stream = reader.map(|result| {
            result.map_err(|e| StorageError::ReadFailed(format!("Failed to read chunk: {}", e)))
        });

        Ok(Box::pin(stream))
    }

    async fn exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.name_to_path(name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.name_to_path(name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Deleted file");

        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<StorageEntry>> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&self.base_path).await?;

        while let Some(entry) = dir.next_entry().await? {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            // Stat failures on one entry must not abort the enumeration.
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "Failed to stat entry, skipping");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "Entry has no modification time, skipping");
                    continue;
                }
            };
            entries.push(StorageEntry {
                name,
                modified,
                size: metadata.len(),
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn collect(mut stream: ByteStream) -> Vec<u8> {
        let mut data = Vec::new();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk.unwrap());
        }
        data
    }

    #[tokio::test]
    async fn put_then_read_roundtrips() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let data = b"hello filedrop".to_vec();
        storage.put("1700000000000-7-hello.txt", data.clone()).await.unwrap();

        let read = collect(storage.open_stream("1700000000000-7-hello.txt").await.unwrap()).await;
        assert_eq!(read, data);
    }

    #[tokio::test]
    async fn put_leaves_no_temporary_file_behind() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage.put("a.txt", b"x".to_vec()).await.unwrap();

        let names: Vec<String> = storage
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a.txt".to_string()]);
    }

    #[tokio::test]
    async fn traversal_shaped_names_are_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        for name in ["", ".", "..", "../x", "a/b.txt", "a\\b.txt"] {
            let result = storage.exists(name).await;
            assert!(
                matches!(result, Err(StorageError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }

        // Dots inside a longer name are a normal filename.
        assert!(!storage.exists("a..b.png").await.unwrap());
    }

    #[tokio::test]
    async fn delete_missing_file_is_ok() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        assert!(storage.delete("nonexistent.txt").await.is_ok());
    }

    #[tokio::test]
    async fn missing_file_reads_as_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.open_stream("missing.png").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_reports_sizes_and_skips_directories() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage.put("one.txt", b"abc".to_vec()).await.unwrap();
        storage.put("two.txt", b"abcdef".to_vec()).await.unwrap();
        fs::create_dir(dir.path().join("subdir")).await.unwrap();

        let mut entries = storage.list().await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "one.txt");
        assert_eq!(entries[0].size, 3);
        assert_eq!(entries[1].name, "two.txt");
        assert_eq!(entries[1].size, 6);
    }
}
