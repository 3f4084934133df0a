//! Service configuration file
//!
//! A single JSON document with optional `http`, `storage` and `ingest`
//! sections. Missing sections and fields take their defaults, so `{}` is a
//! valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::ingest::IngestConfig;
use crate::storage::StorageConfig;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ingest: IngestConfig,
}

impl ServiceConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: ServiceConfig = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise; then apply `DATABASE_URL`
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.storage.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        self.storage.validate()?;

        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("http.host is empty"));
        }

        if self.http.max_upload_bytes == 0 {
            return Err(CliError::config_error("http.max_upload_bytes must be > 0"));
        }

        if self.ingest.extension.is_empty() {
            return Err(CliError::config_error("ingest.extension is empty"));
        }

        if self.ingest.date_formats.iter().next().is_none() {
            return Err(CliError::config_error(
                "ingest.date_formats must list at least one format",
            ));
        }

        let labels = self.ingest.headers.required();
        if labels.iter().any(|label| label.trim().is_empty()) {
            return Err(CliError::config_error("ingest.headers has an empty label"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_object_is_default() {
        let file = write_config("{}");
        let config = ServiceConfig::load(file.path()).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let file = write_config(
            r#"{"http": {"port": 9100}, "ingest": {"date_formats": ["%Y-%m-%d"]}}"#,
        );
        let config = ServiceConfig::load(file.path()).unwrap();
        assert_eq!(config.http.port, 9100);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.ingest.extension, ".csv");
        assert_eq!(config.ingest.date_formats.iter().collect::<Vec<_>>(), vec!["%Y-%m-%d"]);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let file = write_config("{not json");
        let err = ServiceConfig::load(file.path()).unwrap_err();
        assert_eq!(err.code_str(), "GRADES_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ServiceConfig::load(Path::new("/nonexistent/grades.json")).unwrap_err();
        assert_eq!(err.code_str(), "GRADES_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_rejects_empty_date_formats() {
        let file = write_config(r#"{"ingest": {"date_formats": []}}"#);
        assert!(ServiceConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_rejects_zero_upload_limit() {
        let file = write_config(r#"{"http": {"max_upload_bytes": 0}}"#);
        assert!(ServiceConfig::load(file.path()).is_err());
    }
}
