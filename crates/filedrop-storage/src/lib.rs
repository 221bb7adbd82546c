//! Storage backends for filedrop
//!
//! Defines the [`Storage`] trait the intake service and retention sweeper work
//! against, and the local-filesystem implementation backing the flat upload
//! namespace.

pub mod local;
pub mod traits;

pub use local::LocalStorage;
pub use traits::{ByteStream, Storage, StorageEntry, StorageError, StorageResult};
