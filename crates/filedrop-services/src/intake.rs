//! Upload intake service
//!
//! Orchestrates one upload: validate → reserve a storage name → persist →
//! build the receipt. HTTP-free; the transport layer hands it the file bytes
//! and the original name.

use std::sync::Arc;

use filedrop_core::{AppError, NameGenerator, UploadPolicy};
use filedrop_storage::Storage;

/// Attempts at drawing a free storage name before giving up. A second draw is
/// only ever needed when two uploads of the same name land in the same
/// millisecond with the same random token.
const MAX_NAME_ATTEMPTS: u32 = 8;

/// One inbound upload, as handed over by the transport layer.
#[derive(Debug)]
pub struct UploadRequest {
    pub original_filename: String,
    /// Size the client declared up front, when the transport carries one.
    pub declared_len: Option<u64>,
    pub data: Vec<u8>,
}

/// Returned to a successful uploader.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub storage_name: String,
    pub public_url: String,
}

pub struct IntakeService {
    policy: UploadPolicy,
    names: NameGenerator,
    storage: Arc<dyn Storage>,
    public_base_url: String,
}

impl IntakeService {
    pub fn new(policy: UploadPolicy, storage: Arc<dyn Storage>, public_base_url: String) -> Self {
        Self {
            policy,
            names: NameGenerator::new(),
            storage,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Handle one upload end to end. On a validation failure nothing is
    /// written; on a storage failure no receipt is produced (a partial
    /// temporary file is garbage for the sweeper, not a stored upload).
    pub async fn handle_upload(&self, request: UploadRequest) -> Result<UploadReceipt, AppError> {
        if let Some(declared) = request.declared_len {
            self.policy.evaluate(&request.original_filename, declared)?;
        }
        let size = request.data.len() as u64;
        self.policy.evaluate(&request.original_filename, size)?;

        let storage_name = self.reserve_name(&request.original_filename).await?;

        self.storage
            .put(&storage_name, request.data)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    storage_name = %storage_name,
                    "Failed to write upload to storage"
                );
                AppError::Storage(e.to_string())
            })?;

        tracing::info!(
            storage_name = %storage_name,
            original_filename = %request.original_filename,
            size_bytes = size,
            "Upload stored"
        );

        Ok(UploadReceipt {
            public_url: format!("{}/uploads/{}", self.public_base_url, storage_name),
            storage_name,
        })
    }

    /// Draw storage names until one is free. Names are practically unique
    /// already; the existence check closes the same-millisecond race.
    async fn reserve_name(&self, original_filename: &str) -> Result<String, AppError> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = self.names.generate(original_filename);
            match self.storage.exists(&name).await {
                Ok(false) => return Ok(name),
                Ok(true) => {
                    tracing::debug!(storage_name = %name, "Generated name collided, retrying");
                }
                Err(e) => return Err(AppError::Storage(e.to_string())),
            }
        }
        Err(AppError::Storage(format!(
            "Could not reserve a free storage name after {} attempts",
            MAX_NAME_ATTEMPTS
        )))
    }
}
