//! Row validator
//!
//! Turns one header-keyed row of strings into a `GradeRecord`.
//!
//! Checks run in a fixed order: date, full name, group number, grade.
//! The first failing check wins; there is no multi-error collection.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::errors::{RowError, ValidationReason};
use super::types::{Grade, GradeRecord};

/// Ordered list of accepted date formats (chrono `strftime` syntax).
///
/// The first format that parses wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateFormats(Vec<String>);

impl DateFormats {
    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(formats.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Parse `raw` with each format in order.
    ///
    /// `%Y` must be written with exactly four digits; chrono alone would
    /// read `24` as the year 24.
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        self.iter().find_map(|format| {
            NaiveDate::parse_from_str(raw, format)
                .ok()
                .filter(|date| year_is_four_digits(format, raw, *date))
        })
    }
}

impl Default for DateFormats {
    fn default() -> Self {
        Self::new(["%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y"])
    }
}

/// Conversion specifiers that consume a run of digits
const NUMERIC_SPECIFIERS: &[char] = &['C', 'd', 'e', 'H', 'I', 'j', 'm', 'M', 'S', 'y', 'Y'];

fn numeric_specifiers(format: &str) -> Vec<char> {
    let mut specifiers = Vec::new();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        // Skip padding modifiers such as `%-d`
        let spec = chars.by_ref().find(|c| !matches!(c, '-' | '_' | '0'));
        if let Some(spec) = spec.filter(|s| NUMERIC_SPECIFIERS.contains(s)) {
            specifiers.push(spec);
        }
    }
    specifiers
}

fn year_is_four_digits(format: &str, raw: &str, date: NaiveDate) -> bool {
    let specifiers = numeric_specifiers(format);
    let Some(position) = specifiers.iter().position(|s| *s == 'Y') else {
        return true;
    };

    let runs: Vec<&str> = raw
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .collect();

    if runs.len() == specifiers.len() {
        runs[position].len() == 4
    } else {
        // Adjacent fields like `%Y%m%d` share one digit run
        (1000..=9999).contains(&date.year())
    }
}

/// The four required cells of one CSV row, untrimmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRow<'a> {
    pub date: &'a str,
    pub group_number: &'a str,
    pub full_name: &'a str,
    pub grade: &'a str,
}

/// True when every cell is empty or whitespace.
///
/// Callers pass the whole row, extra columns included; a row with text only
/// in an unrequired column is not blank.
pub fn is_blank_row<'a, I>(cells: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    cells.into_iter().all(|cell| cell.trim().is_empty())
}

/// Parse a grade cell: trimmed, integer, within 2..=5
pub fn parse_grade(raw: &str) -> Result<Grade, ValidationReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationReason::EmptyGrade);
    }

    let value: i64 = trimmed
        .parse()
        .map_err(|_| ValidationReason::GradeNotInteger(trimmed.to_string()))?;

    Grade::try_from(value)
}

fn required_text(raw: &str, reason: ValidationReason) -> Result<String, ValidationReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(reason)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Validates rows against a fixed set of date formats.
///
/// Validator does not mutate its input and is deterministic.
pub struct RecordValidator<'a> {
    date_formats: &'a DateFormats,
}

impl<'a> RecordValidator<'a> {
    pub fn new(date_formats: &'a DateFormats) -> Self {
        Self { date_formats }
    }

    /// Validate one non-blank data row.
    ///
    /// `row_number` is the 1-based source row used in the error message.
    /// Blank rows are skipped by the caller before they get here.
    pub fn validate_row(&self, row_number: usize, row: &RawRow<'_>) -> Result<GradeRecord, RowError> {
        self.validate(row)
            .map_err(|reason| RowError::new(row_number, reason))
    }

    /// Validate the four required cells of a row
    pub fn validate(&self, row: &RawRow<'_>) -> Result<GradeRecord, ValidationReason> {
        let date = self.parse_date(row.date)?;
        let full_name = required_text(row.full_name, ValidationReason::EmptyFullName)?;
        let group_number = required_text(row.group_number, ValidationReason::EmptyGroupNumber)?;
        let grade = parse_grade(row.grade)?;

        Ok(GradeRecord {
            date,
            group_number,
            full_name,
            grade,
        })
    }

    pub fn parse_date(&self, raw: &str) -> Result<NaiveDate, ValidationReason> {
        let trimmed = raw.trim();
        self.date_formats
            .parse(trimmed)
            .ok_or_else(|| ValidationReason::InvalidDate(trimmed.to_string()))
    }
}
