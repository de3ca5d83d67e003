use std::path::PathBuf;

use axum::{Json, extract::multipart::MultipartError, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Malformed form submission: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure to persist an uploaded file. Callers get this instead of a
/// stored filename, never alongside one.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid upload file name: {0:?}")]
    InvalidFileName(String),

    #[error("failed to write upload {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Multipart(e) => (e.status(), e.body_text()),
            AppError::Database(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
            AppError::Upload(e) => {
                error!("upload error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "File upload failed".to_string(),
                )
            }
            AppError::Config(msg) => {
                error!("configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}
