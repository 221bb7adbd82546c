//! Storage abstraction trait
//!
//! All storage backends must implement this trait. The namespace is flat:
//! names are single path components, uniqueness is the caller's concern, and
//! the only metadata is what the backend itself records (modification time).

use std::pin::Pin;
use std::time::SystemTime;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage name: {0}")]
    InvalidName(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One entry in the storage namespace, as seen by the retention sweeper.
#[derive(Debug, Clone)]
pub struct StorageEntry {
    pub name: String,
    pub modified: SystemTime,
    pub size: u64,
}

/// Byte stream returned when reading a stored file.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist bytes under the given name. The file must not be observable
    /// under its final name until the write is complete.
    async fn put(&self, name: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Open a stored file for streaming reads.
    async fn open_stream(&self, name: &str) -> StorageResult<ByteStream>;

    /// Whether a file exists under the given name.
    async fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Delete a file. Deleting a name that does not exist is not an error.
    async fn delete(&self, name: &str) -> StorageResult<()>;

    /// Enumerate every entry in the namespace with its modification time.
    async fn list(&self) -> StorageResult<Vec<StorageEntry>>;
}
