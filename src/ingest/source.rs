//! CSV source
//!
//! Decoding, delimiter detection and header resolution for an uploaded file.
//!
//! The whole upload is held in memory; there is no streaming.

use csv::{ReaderBuilder, StringRecord};

use crate::records::{RawRow, RecordField};

use super::config::HeaderLabels;
use super::errors::{IngestError, IngestResult};

/// Byte-order mark some spreadsheet exports prepend
pub const UTF8_BOM: &str = "\u{feff}";

/// Source row number of the first data row; the header is row 1
pub const FIRST_DATA_ROW: usize = 2;

/// Decode as UTF-8 and drop a leading byte-order mark
pub fn decode_utf8(bytes: &[u8]) -> IngestResult<&str> {
    let text = std::str::from_utf8(bytes).map_err(|_| IngestError::InvalidEncoding)?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text))
}

/// `;` if the first line contains one, otherwise `,`.
///
/// Only the first line is inspected; every row is split with the result.
pub fn detect_delimiter(text: &str) -> u8 {
    let first_line = text.split('\n').next().unwrap_or("");
    if first_line.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Positions of the required columns within a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    date: usize,
    group_number: usize,
    full_name: usize,
    grade: usize,
}

impl ColumnIndex {
    /// Locate every required label in `headers`.
    ///
    /// A repeated header resolves to its last occurrence.
    pub fn resolve(headers: &[String], labels: &HeaderLabels) -> IngestResult<Self> {
        let find = |field: RecordField| {
            let label = labels.label(field);
            headers.iter().rposition(|h| h == label)
        };

        let positions: Vec<Option<usize>> = RecordField::ALL.iter().map(|f| find(*f)).collect();
        let missing: Vec<String> = RecordField::ALL
            .iter()
            .zip(&positions)
            .filter(|(_, position)| position.is_none())
            .map(|(field, _)| labels.label(*field).to_string())
            .collect();

        match positions.as_slice() {
            [Some(date), Some(group_number), Some(full_name), Some(grade)] => Ok(Self {
                date: *date,
                group_number: *group_number,
                full_name: *full_name,
                grade: *grade,
            }),
            _ => Err(IngestError::MissingColumns {
                missing,
                required: labels.required(),
                found: headers.to_vec(),
            }),
        }
    }

    /// Required cells of `record`; cells past the end of a short row read as empty
    pub fn raw_row<'r>(&self, record: &'r StringRecord) -> RawRow<'r> {
        let cell = |index: usize| record.get(index).unwrap_or("");
        RawRow {
            date: cell(self.date),
            group_number: cell(self.group_number),
            full_name: cell(self.full_name),
            grade: cell(self.grade),
        }
    }
}

/// A decoded upload positioned after its header row
pub struct CsvSource<'a> {
    reader: csv::Reader<&'a [u8]>,
    headers: Vec<String>,
    columns: ColumnIndex,
    delimiter: u8,
}

impl<'a> CsvSource<'a> {
    /// Detect the delimiter, read and trim the header row, resolve columns
    pub fn open(text: &'a str, labels: &HeaderLabels) -> IngestResult<Self> {
        let delimiter = detect_delimiter(text);
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() {
            return Err(IngestError::EmptyFile);
        }

        let columns = ColumnIndex::resolve(&headers, labels)?;

        Ok(Self {
            reader,
            headers,
            columns,
            delimiter,
        })
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> ColumnIndex {
        self.columns
    }

    /// Data rows in file order with their source row numbers.
    ///
    /// Physically empty lines are not rows and take no number.
    pub fn rows(&mut self) -> Rows<'_, 'a> {
        Rows {
            records: self.reader.records(),
            next_row: FIRST_DATA_ROW,
        }
    }
}

/// Iterator over `(row number, record)` pairs
pub struct Rows<'s, 'a> {
    records: csv::StringRecordsIter<'s, &'a [u8]>,
    next_row: usize,
}

impl Iterator for Rows<'_, '_> {
    type Item = IngestResult<(usize, StringRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        let row = self.next_row;
        self.next_row += 1;
        Some(record.map(|r| (row, r)).map_err(IngestError::from))
    }
}
