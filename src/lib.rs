//! student_grades - CSV ingestion of student grades with aggregate "twos" reports
//!
//! Uploads replace the whole grades table in one transaction; reports count
//! grade-2 records per student against a threshold.

pub mod cli;
pub mod http_server;
pub mod ingest;
pub mod observability;
pub mod queries;
pub mod records;
pub mod storage;
