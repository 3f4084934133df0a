//! # HTTP API Errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ingest::IngestError;
use crate::storage::StorageError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Multipart body had no `file` field
    #[error("Файл не передан")]
    MissingFile,

    /// Multipart body could not be read
    #[error("Некорректный запрос: {0}")]
    InvalidMultipart(String),

    // ==================
    // Upload Errors (4xx or 5xx)
    // ==================
    #[error(transparent)]
    Ingest(#[from] IngestError),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Ошибка сервера: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            ApiError::MissingFile | ApiError::InvalidMultipart(_) => 400,
            ApiError::Ingest(e) => e.status_code(),
            ApiError::Storage(e) => e.status_code(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: u16,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
