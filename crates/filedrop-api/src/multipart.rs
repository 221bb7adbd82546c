//! Multipart extraction for the upload route.

use axum::extract::Multipart;
use filedrop_core::AppError;

/// Extract the single uploaded file from a multipart form.
///
/// Any field carrying a filename counts as the file (uploader clients differ
/// on the field name; the common one is `files[]`). More than one file field
/// is rejected; fields without a filename are ignored.
pub async fn extract_upload_file(mut multipart: Multipart) -> Result<(Vec<u8>, String), AppError> {
    let mut file: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart body: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple files are not allowed; send exactly one file field".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

        file = Some((data.to_vec(), filename));
    }

    file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}
