//! Upload handler
//!
//! `POST /upload`: takes one multipart file field, delegates to the intake
//! service, and shapes the receipt per the configured output format.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use filedrop_core::ReceiptFormat;
use filedrop_services::UploadRequest;
use serde::Serialize;

use crate::error::HttpAppError;
use crate::multipart::extract_upload_file;
use crate::state::AppState;

/// Discord-style attachment receipt, for clients expecting that shape.
#[derive(Debug, Serialize)]
pub struct AttachmentReceipt {
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
pub struct Attachment {
    pub url: String,
    pub proxy_url: String,
}

impl AttachmentReceipt {
    fn new(url: &str) -> Self {
        Self {
            attachments: vec![Attachment {
                url: url.to_string(),
                proxy_url: url.to_string(),
            }],
        }
    }
}

#[tracing::instrument(skip(state, multipart), fields(operation = "upload"))]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let (data, original_filename) = extract_upload_file(multipart).await?;

    let receipt = state
        .intake
        .handle_upload(UploadRequest {
            original_filename,
            // Multipart carries no per-file length up front; the intake
            // service validates the actual byte count.
            declared_len: None,
            data,
        })
        .await?;

    Ok(match state.config.receipt_format {
        ReceiptFormat::AttachmentJson => {
            Json(AttachmentReceipt::new(&receipt.public_url)).into_response()
        }
        ReceiptFormat::BareUrl => receipt.public_url.into_response(),
    })
}
