//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::ingest::IngestError;
use crate::storage::StorageError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (file or stdout)
    IoError,
    /// Storage could not be reached at startup
    StorageUnavailable,
    /// Checked file failed validation
    InvalidUpload,
    /// Boot failed
    BootFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "GRADES_CLI_CONFIG_ERROR",
            Self::IoError => "GRADES_CLI_IO_ERROR",
            Self::StorageUnavailable => "GRADES_CLI_STORAGE_UNAVAILABLE",
            Self::InvalidUpload => "GRADES_CLI_INVALID_UPLOAD",
            Self::BootFailed => "GRADES_CLI_BOOT_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn storage_unavailable(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::StorageUnavailable, msg)
    }

    pub fn invalid_upload(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidUpload, msg)
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidConfig(msg) => Self::config_error(msg),
            other => Self::storage_unavailable(other.to_string()),
        }
    }
}

impl From<IngestError> for CliError {
    fn from(e: IngestError) -> Self {
        Self::invalid_upload(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("port must be > 0");
        assert_eq!(err.to_string(), "GRADES_CLI_CONFIG_ERROR: port must be > 0");
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_storage_config_error_maps_to_config() {
        let err = CliError::from(StorageError::InvalidConfig("database_url is empty".into()));
        assert_eq!(err.code(), &CliErrorCode::ConfigError);

        let err = CliError::from(StorageError::Unavailable("refused".into()));
        assert_eq!(err.code(), &CliErrorCode::StorageUnavailable);
    }

    #[test]
    fn test_ingest_error_keeps_message() {
        let err = CliError::from(IngestError::NoData);
        assert_eq!(err.code_str(), "GRADES_CLI_INVALID_UPLOAD");
        assert_eq!(err.message(), "Нет данных для загрузки");
    }
}
