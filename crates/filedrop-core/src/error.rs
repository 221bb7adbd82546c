//! Error types module
//!
//! All request-path failures are unified under [`AppError`]. Validation
//! failures carry the offending rule back to the caller verbatim; storage
//! failures are summarized for the caller while the full detail is logged
//! server-side.

use thiserror::Error;

use crate::validation::ValidationError;

/// Log level an error should be reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors such as validation failures
    Debug,
    /// Unexpected failures
    Error,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code this error maps to.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::InvalidInput(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Storage(_) | AppError::Internal(_) => 500,
        }
    }

    /// Message safe to hand back to the client. Validation errors name the
    /// offending rule; storage detail stays in the operational log.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Storage(_) => "File upload failed".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::Validation(_) | AppError::InvalidInput(_) | AppError::NotFound(_) => {
                LogLevel::Debug
            }
            AppError::Storage(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{SizeLimits, UploadPolicy};

    #[test]
    fn validation_errors_keep_their_message_for_the_client() {
        let err = UploadPolicy::new(vec![".jpg".into()], SizeLimits::default())
            .evaluate("movie.exe", 1)
            .unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.http_status_code(), 400);
        assert!(app.client_message().starts_with("File type not allowed"));
    }

    #[test]
    fn storage_errors_are_summarized_for_the_client() {
        let app = AppError::Storage("disk full on /uploads".to_string());
        assert_eq!(app.http_status_code(), 500);
        assert_eq!(app.client_message(), "File upload failed");
        assert_eq!(app.log_level(), LogLevel::Error);
    }
}
