//! CSV ingestion pipeline
//!
//! upload → extension check → UTF-8 decode → delimiter/header detection →
//! per-row validation (fail fast) → transactional full replace → summary.
//!
//! Parsing is a pure function of the uploaded bytes; storage is touched only
//! once every row has validated.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::records::{is_blank_row, DateFormats, GradeRecord, RecordValidator};
use crate::storage::GradeStore;

use super::config::IngestConfig;
use super::errors::{IngestError, IngestResult};
use super::source::{decode_utf8, ColumnIndex, CsvSource};

/// Outcome of a successful upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub records_loaded: usize,
    pub students: usize,
}

impl UploadSummary {
    pub fn from_records(records: &[GradeRecord]) -> Self {
        Self {
            records_loaded: records.len(),
            students: count_distinct_students(records),
        }
    }
}

/// Number of distinct full names in `records`
pub fn count_distinct_students(records: &[GradeRecord]) -> usize {
    records
        .iter()
        .map(|r| r.full_name.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Validate numbered rows in order, stopping at the first invalid one.
///
/// Blank rows are skipped. An input that yields no records is `NoData`.
pub fn validate_rows<I>(
    rows: I,
    columns: ColumnIndex,
    date_formats: &DateFormats,
) -> IngestResult<Vec<GradeRecord>>
where
    I: IntoIterator<Item = IngestResult<(usize, csv::StringRecord)>>,
{
    let validator = RecordValidator::new(date_formats);
    let mut records = Vec::new();

    for row in rows {
        let (row_number, record) = row?;
        if is_blank_row(record.iter()) {
            continue;
        }
        records.push(validator.validate_row(row_number, &columns.raw_row(&record))?);
    }

    if records.is_empty() {
        return Err(IngestError::NoData);
    }
    Ok(records)
}

/// Parse an uploaded file into a complete validated batch
pub fn parse_upload(
    bytes: &[u8],
    filename: &str,
    config: &IngestConfig,
) -> IngestResult<Vec<GradeRecord>> {
    if !config.accepts_filename(filename) {
        return Err(IngestError::NotCsv {
            filename: filename.to_string(),
        });
    }

    let text = decode_utf8(bytes)?;
    let mut source = CsvSource::open(text, &config.headers)?;
    let columns = source.columns();

    validate_rows(source.rows(), columns, &config.date_formats)
}

/// Validates uploads and replaces the stored grades with them
#[derive(Clone)]
pub struct CsvIngestor {
    config: Arc<IngestConfig>,
    store: Arc<dyn GradeStore>,
}

impl CsvIngestor {
    pub fn new(config: IngestConfig, store: Arc<dyn GradeStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingest one uploaded file.
    ///
    /// On any error the stored records are left exactly as they were.
    pub async fn upload(&self, bytes: &[u8], filename: &str) -> IngestResult<UploadSummary> {
        let upload_id = Uuid::new_v4().to_string();
        log_event_with_fields(
            Event::UploadReceived,
            &[
                ("bytes", &bytes.len().to_string()),
                ("filename", filename),
                ("upload_id", &upload_id),
            ],
        );

        let records = match parse_upload(bytes, filename, &self.config) {
            Ok(records) => records,
            Err(e) => {
                Logger::warn(
                    Event::UploadRejected.as_str(),
                    &[
                        ("kind", e.kind()),
                        ("message", &e.to_string()),
                        ("upload_id", &upload_id),
                    ],
                );
                return Err(e);
            }
        };

        let summary = UploadSummary::from_records(&records);

        if let Err(e) = self.store.replace_all(&records).await {
            Logger::error(
                Event::UploadFailed.as_str(),
                &[("error", &e.to_string()), ("upload_id", &upload_id)],
            );
            return Err(e.into());
        }

        log_event_with_fields(
            Event::UploadCommitted,
            &[
                ("records_loaded", &summary.records_loaded.to_string()),
                ("students", &summary.students.to_string()),
                ("upload_id", &upload_id),
            ],
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{RowError, ValidationReason};

    const HEADER: &str = "Дата;Номер группы;ФИО;Оценка\n";

    fn parse(body: &str) -> IngestResult<Vec<GradeRecord>> {
        let text = format!("{HEADER}{body}");
        parse_upload(text.as_bytes(), "grades.csv", &IngestConfig::default())
    }

    #[test]
    fn test_parses_in_file_order() {
        let records = parse("01.09.2023;A-1;Иванов;5\n2023-09-02;A-1;Петров;2\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].full_name, "Иванов");
        assert_eq!(records[1].full_name, "Петров");
    }

    #[test]
    fn test_extension_checked_before_parsing() {
        let err = parse_upload(&[0xff, 0xff], "grades.txt", &IngestConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::NotCsv { .. }));
    }

    #[test]
    fn test_blank_row_keeps_numbering() {
        let err = parse("01.09.2023;A-1;Иванов;5\n;;;\n01.09.2023;A-1;Петров;7\n").unwrap_err();
        match err {
            IngestError::Row(RowError { row, reason }) => {
                assert_eq!(row, 4);
                assert_eq!(reason, ValidationReason::GradeOutOfRange(7));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_text_in_extra_column_is_not_blank() {
        let text = "Дата;Номер группы;ФИО;Оценка;Комментарий\n01.01.2024;A;Ким;3;\n;;;;важно\n";
        let err = parse_upload(text.as_bytes(), "grades.csv", &IngestConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Ошибка в строке 3: Неверная дата: ");
    }

    #[test]
    fn test_blank_row_with_extra_columns_skipped() {
        let text = "Дата;Номер группы;ФИО;Оценка;Комментарий\n01.01.2024;A;Ким;3;\n;;;; \n";
        let records = parse_upload(text.as_bytes(), "grades.csv", &IngestConfig::default()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_rows_split_with_header_delimiter() {
        let text = "Дата,Номер группы,ФИО,Оценка\n01.02.2024,A;1,Ким,4\n";
        let records = parse_upload(text.as_bytes(), "grades.csv", &IngestConfig::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].group_number, "A;1");
        assert_eq!(records[0].full_name, "Ким");
    }

    #[test]
    fn test_two_digit_year_rejected() {
        let err = parse("01.02.24;A;Ким;3\n").unwrap_err();
        assert_eq!(err.to_string(), "Ошибка в строке 2: Неверная дата: 01.02.24");
    }

    #[test]
    fn test_first_error_wins() {
        let err = parse("bad;A-1;Иванов;5\n01.09.2023;A-1;Петров;A\n").unwrap_err();
        assert_eq!(err.to_string(), "Ошибка в строке 2: Неверная дата: bad");
    }

    #[test]
    fn test_only_blank_rows_is_no_data() {
        assert!(matches!(parse(";;;\n ; ; ; \n"), Err(IngestError::NoData)));
        assert!(matches!(parse(""), Err(IngestError::NoData)));
    }

    #[test]
    fn test_comma_delimited_with_bom() {
        let text = "\u{feff}Дата,Номер группы,ФИО,Оценка\r\n01/02/2024,Б-2,Смирнова,3\r\n";
        let records = parse_upload(text.as_bytes(), "x.csv", &IngestConfig::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].group_number, "Б-2");
        assert_eq!(records[0].grade.value(), 3);
    }

    #[test]
    fn test_distinct_students() {
        let records = parse(
            "01.09.2023;A-1;Иванов;5\n01.09.2023;A-1;Иванов;2\n01.09.2023;A-2;Петров;4\n",
        )
        .unwrap();
        assert_eq!(
            UploadSummary::from_records(&records),
            UploadSummary {
                records_loaded: 3,
                students: 2
            }
        );
    }
}
