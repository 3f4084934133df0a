//! Grade records and their row-level validation
//!
//! A grade record is one validated CSV row: date, group number, student
//! full name and a grade in 2..=5. Records are only ever produced by the
//! validator; storage never sees an unvalidated row.

mod errors;
mod types;
mod validator;

pub use errors::{RowError, ValidationReason};
pub use types::{Grade, GradeRecord, RecordField, StudentTwoCount, MAX_GRADE, MIN_GRADE};
pub use validator::{is_blank_row, parse_grade, DateFormats, RawRow, RecordValidator};
