//! CSV ingestion
//!
//! Accepts an uploaded grades file and replaces the stored records with its
//! contents.
//!
//! # Rules
//!
//! - Filename must carry the configured extension
//! - UTF-8, optional leading byte-order mark
//! - Delimiter is `;` when the first line has one, `,` otherwise
//! - All required header labels must be present (after trimming)
//! - Rows are validated in order; the first invalid row aborts the upload
//! - Nothing is written unless every row is valid

mod config;
mod errors;
mod pipeline;
mod source;

pub use config::{HeaderLabels, IngestConfig};
pub use errors::{IngestError, IngestResult};
pub use pipeline::{count_distinct_students, parse_upload, validate_rows, CsvIngestor, UploadSummary};
pub use source::{decode_utf8, detect_delimiter, ColumnIndex, CsvSource, Rows, FIRST_DATA_ROW, UTF8_BOM};
