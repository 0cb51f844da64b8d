use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Multipart field carrying the CSV.
pub const UPLOAD_FIELD: &str = "file";

/// Reads the CSV bytes from the `file` field. Other fields are ignored.
pub async fn read_csv_upload(mut multipart: Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        debug!(
            "Received upload {:?} ({} bytes)",
            file_name.as_deref().unwrap_or("<unnamed>"),
            data.len()
        );
        return Ok(data);
    }
    Err(AppError::Validation(format!(
        "Upload a CSV file in the '{UPLOAD_FIELD}' form field"
    )))
}
