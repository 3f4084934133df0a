//! # Ingestion Errors

use thiserror::Error;

use crate::records::RowError;
use crate::storage::StorageError;

/// Result type for ingestion
pub type IngestResult<T> = Result<T, IngestError>;

/// Upload failures.
///
/// Everything except `Storage` is a problem with the uploaded file and is
/// reported to the client with its localized message.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Файл должен быть в формате CSV")]
    NotCsv { filename: String },

    #[error("Файл должен быть в кодировке UTF-8")]
    InvalidEncoding,

    #[error("CSV файл пустой")]
    EmptyFile,

    #[error(
        "Отсутствуют колонки: {}. Нужны колонки: {}. Найдено: {}",
        .missing.join(", "),
        .required.join(", "),
        .found.join(", ")
    )]
    MissingColumns {
        missing: Vec<String>,
        required: Vec<String>,
        found: Vec<String>,
    },

    #[error("Ошибка чтения CSV: {0}")]
    MalformedCsv(String),

    #[error(transparent)]
    Row(#[from] RowError),

    #[error("Нет данных для загрузки")]
    NoData,

    #[error("Ошибка сервера: {0}")]
    Storage(#[from] StorageError),
}

impl IngestError {
    pub fn is_client_error(&self) -> bool {
        !matches!(self, IngestError::Storage(_))
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            IngestError::Storage(e) => e.status_code(),
            _ => 400,
        }
    }

    /// Stable short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::NotCsv { .. } => "not_csv",
            IngestError::InvalidEncoding => "invalid_encoding",
            IngestError::EmptyFile => "empty_file",
            IngestError::MissingColumns { .. } => "missing_columns",
            IngestError::MalformedCsv(_) => "malformed_csv",
            IngestError::Row(_) => "invalid_row",
            IngestError::NoData => "no_data",
            IngestError::Storage(_) => "storage",
        }
    }
}

impl From<csv::Error> for IngestError {
    fn from(e: csv::Error) -> Self {
        IngestError::MalformedCsv(e.to_string())
    }
}
