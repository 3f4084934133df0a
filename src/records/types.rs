//! Record types shared by ingestion, storage and queries

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::ValidationReason;

/// Lowest accepted grade
pub const MIN_GRADE: u8 = 2;

/// Highest accepted grade
pub const MAX_GRADE: u8 = 5;

/// A grade in the inclusive range `MIN_GRADE..=MAX_GRADE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Grade(u8);

impl Grade {
    /// The failing grade counted by the aggregate queries
    pub const TWO: Grade = Grade(2);

    /// Raw numeric value
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Grade {
    type Error = ValidationReason;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (MIN_GRADE as i64..=MAX_GRADE as i64).contains(&value) {
            Ok(Grade(value as u8))
        } else {
            Err(ValidationReason::GradeOutOfRange(value))
        }
    }
}

impl From<Grade> for i64 {
    fn from(grade: Grade) -> Self {
        grade.0 as i64
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four columns every upload must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Date,
    GroupNumber,
    FullName,
    Grade,
}

impl RecordField {
    /// All fields in column order
    pub const ALL: [RecordField; 4] = [
        RecordField::Date,
        RecordField::GroupNumber,
        RecordField::FullName,
        RecordField::Grade,
    ];
}

/// One validated grade entry.
///
/// Duplicates are legal: two identical records are stored twice and both
/// count towards the aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub date: NaiveDate,
    pub group_number: String,
    pub full_name: String,
    pub grade: Grade,
}

impl GradeRecord {
    pub fn new(
        date: NaiveDate,
        group_number: impl Into<String>,
        full_name: impl Into<String>,
        grade: Grade,
    ) -> Self {
        Self {
            date,
            group_number: group_number.into(),
            full_name: full_name.into(),
            grade,
        }
    }

    pub fn is_two(&self) -> bool {
        self.grade == Grade::TWO
    }
}

/// Number of grade-2 records for one student, as returned by the aggregate queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentTwoCount {
    pub full_name: String,
    pub count_twos: i64,
}

impl StudentTwoCount {
    pub fn new(full_name: impl Into<String>, count_twos: i64) -> Self {
        Self {
            full_name: full_name.into(),
            count_twos,
        }
    }
}
