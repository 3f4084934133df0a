//! CLI module for the grades service
//!
//! Provides command-line interface for:
//! - serve: Open storage and run the HTTP server
//! - check: Validate a CSV file offline

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, run, run_command, serve};
pub use config::ServiceConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
