//! Filedrop Core Library
//!
//! This crate provides the domain logic shared across all filedrop components:
//! configuration, error types, the upload validation policy, and storage-name
//! generation. It performs no I/O beyond reading the environment at startup.

pub mod config;
pub mod error;
pub mod naming;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, ReceiptFormat};
pub use error::{AppError, LogLevel};
pub use naming::NameGenerator;
pub use validation::{FileCategory, SizeLimits, UploadPolicy, ValidationError};
