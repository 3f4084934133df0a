//! # Storage Errors
//!
//! Every storage failure surfaces to clients as a server error. There is no
//! retry policy; a failed call is simply reported.

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid storage configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Get HTTP status code; storage failures are always server errors
    pub fn status_code(&self) -> u16 {
        500
    }
}
