//! Static serving of stored uploads
//!
//! `GET /uploads/{name}`: streams the stored bytes with a guessed
//! Content-Type and the configured Cache-Control lifetime. Reads never mutate
//! anything, so the same name serves identical bytes on every request.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use filedrop_core::AppError;
use filedrop_storage::StorageError;
use futures::StreamExt;

use crate::error::HttpAppError;
use crate::state::AppState;

#[tracing::instrument(skip(state), fields(operation = "serve_upload"))]
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, HttpAppError> {
    let stream = state.storage.open_stream(&name).await.map_err(|e| match e {
        StorageError::NotFound(_) => AppError::NotFound("File not found".to_string()),
        StorageError::InvalidName(_) => AppError::InvalidInput("Invalid file name".to_string()),
        other => {
            tracing::error!(error = %other, name = %name, "Failed to open stored file");
            AppError::Internal(other.to_string())
        }
    })?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let mime = mime_guess::from_path(&name).first_or_octet_stream();

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.essence_str())
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.config.cache_time_secs),
        )
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}
