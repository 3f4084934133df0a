//! CLI command implementations
//!
//! `serve` resolves configuration, opens the grade store and runs the HTTP
//! server until Ctrl-C. `check` validates a local CSV file with the same
//! rules as an upload and never touches storage.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::http_server::HttpServer;
use crate::ingest::{parse_upload, UploadSummary};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::storage::{GradeStore, MemoryGradeStore, PostgresGradeStore, StorageConfig};

use super::args::Command;
use super::config::ServiceConfig;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            host,
            port,
            memory,
        } => serve(config.as_deref(), host, port, memory),
        Command::Check { file, config } => check(&file, config.as_deref()),
    }
}

/// Start the HTTP server
///
/// 1. Resolve configuration (file, then `DATABASE_URL`, then flags)
/// 2. Open the grade store
/// 3. Serve until Ctrl-C, then close the store
pub fn serve(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    memory: bool,
) -> CliResult<()> {
    log_event(Event::ServiceStart);

    let mut config = ServiceConfig::resolve(config_path)?;
    if let Some(host) = host {
        config.http.host = host;
    }
    if let Some(port) = port {
        config.http.port = port;
    }

    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("addr", &config.http.socket_addr()),
            ("store", if memory { "memory" } else { "postgres" }),
        ],
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async move {
        let store = open_store(&config.storage, memory).await?;
        let server = HttpServer::new(config.http, store, config.ingest);

        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

async fn open_store(config: &StorageConfig, memory: bool) -> CliResult<Arc<dyn GradeStore>> {
    if memory {
        return Ok(Arc::new(MemoryGradeStore::new()));
    }

    match PostgresGradeStore::connect(config).await {
        Ok(store) => {
            log_event_with_fields(
                Event::PoolConnected,
                &[
                    ("min_connections", &config.min_connections.to_string()),
                    ("max_connections", &config.max_connections.to_string()),
                ],
            );
            Ok(Arc::new(store))
        }
        Err(e) => {
            log_event_with_fields(Event::PoolConnectFailed, &[("error", &e.to_string())]);
            Err(e.into())
        }
    }
}

/// Validate a CSV file and print the upload summary it would produce
pub fn check(file: &Path, config_path: Option<&Path>) -> CliResult<()> {
    let config = ServiceConfig::resolve(config_path)?;

    let bytes = fs::read(file)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", file.display(), e)))?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match parse_upload(&bytes, &filename, &config.ingest) {
        Ok(records) => write_response(&UploadSummary::from_records(&records)),
        Err(e) => {
            write_error(e.kind(), &e.to_string())?;
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_check_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "grades.csv",
            "Дата;Номер группы;ФИО;Оценка\n01.09.2024;101Б;Иванов;2\n02.09.2024;101Б;Петров;5\n",
        );

        check(&path, None).unwrap();
    }

    #[test]
    fn test_check_invalid_row() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "grades.csv",
            "Дата;Номер группы;ФИО;Оценка\n01.09.2024;101Б;Иванов;6\n",
        );

        let err = check(&path, None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidUpload);
        assert!(err.message().contains("строке 2"));
    }

    #[test]
    fn test_check_rejects_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "grades.txt", "Дата;Номер группы;ФИО;Оценка\n");

        let err = check(&path, None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidUpload);
    }

    #[test]
    fn test_check_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = check(&dir.path().join("absent.csv"), None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::IoError);
    }

    #[test]
    fn test_serve_rejects_bad_config() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "grades.json", "[]");

        let err = serve(Some(&path), None, None, true).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
