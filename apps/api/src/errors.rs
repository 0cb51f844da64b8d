use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::recipients::{LoadError, REQUIRED_COLUMNS};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("CSV file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LoadError> for AppError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::MissingColumns(missing) => AppError::MissingColumns(missing),
            other => AppError::InvalidCsv(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): (_, _, _, Option<Value>) = match &self {
            AppError::MissingColumns(missing) => (
                StatusCode::BAD_REQUEST,
                "MISSING_COLUMNS",
                self.to_string(),
                Some(json!({
                    "missing": missing,
                    "expected": REQUIRED_COLUMNS,
                })),
            ),
            AppError::InvalidCsv(msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_CSV",
                format!("Error loading CSV file: {msg}"),
                Some(json!({ "hint": "Please ensure your file is a valid CSV format." })),
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
                None,
            ),
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_ERROR",
                    format!("Error generating letters: {msg}"),
                    Some(json!({ "hint": "Please check your CSV file format and try again." })),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
