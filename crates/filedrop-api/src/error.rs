//! HTTP error response conversion
//!
//! Wraps `AppError` so it can implement `IntoResponse` (orphan rule: both the
//! trait and the error type live in other crates). Error bodies are plain
//! text; validation messages go to the client verbatim, storage detail stays
//! in the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use filedrop_core::{AppError, LogLevel};

#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let error = &self.0;
        log_error(error);

        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, error.client_message()).into_response()
    }
}
