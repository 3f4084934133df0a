//! CLI argument definitions using clap
//!
//! Commands:
//! - student-grades serve [--config <path>] [--host <host>] [--port <port>] [--memory]
//! - student-grades check <file> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Student grades CSV ingestion and reporting service
#[derive(Parser, Debug)]
#[command(name = "student-grades")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind, overrides the configuration file
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overrides the configuration file
        #[arg(long)]
        port: Option<u16>,

        /// Keep grades in process memory instead of Postgres
        #[arg(long)]
        memory: bool,
    },

    /// Validate a grades CSV file without storing it
    Check {
        /// CSV file to validate
        file: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
