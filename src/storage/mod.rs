//! Storage subsystem
//!
//! Owns the database connection pool and the `grades` table.
//!
//! # Design Principles
//!
//! - Full replace: an upload clears the table and inserts the new batch
//! - Replace is one transaction (clear + insert + commit, rollback on error)
//! - No uniqueness constraint; duplicate rows are kept
//! - No retries; failures propagate to the caller

mod config;
mod errors;
mod gateway;
mod memory;
mod postgres;
mod store;

pub use config::{StorageConfig, DATABASE_URL_ENV, DEFAULT_DATABASE_URL};
pub use errors::{StorageError, StorageResult};
pub use gateway::{GatewayTransaction, SqlValue, StorageGateway, MAX_BIND_PARAMS};
pub use memory::MemoryGradeStore;
pub use postgres::PostgresGradeStore;
pub use store::GradeStore;
