//! Row validation errors
//!
//! Messages are the localized texts shown to the person uploading the file.

use thiserror::Error;

use super::types::RecordField;

/// Why a single row was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("Неверная дата: {0}")]
    InvalidDate(String),

    #[error("ФИО пусто")]
    EmptyFullName,

    #[error("Номер группы пуст")]
    EmptyGroupNumber,

    #[error("Оценка пуста")]
    EmptyGrade,

    #[error("Неверная оценка: {0}")]
    GradeNotInteger(String),

    #[error("Оценка {0} должна быть от 2 до 5")]
    GradeOutOfRange(i64),
}

impl ValidationReason {
    /// The column the reason refers to
    pub fn field(&self) -> RecordField {
        match self {
            ValidationReason::InvalidDate(_) => RecordField::Date,
            ValidationReason::EmptyFullName => RecordField::FullName,
            ValidationReason::EmptyGroupNumber => RecordField::GroupNumber,
            ValidationReason::EmptyGrade
            | ValidationReason::GradeNotInteger(_)
            | ValidationReason::GradeOutOfRange(_) => RecordField::Grade,
        }
    }
}

/// A rejected row, numbered from 1 with the header as row 1
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Ошибка в строке {row}: {reason}")]
pub struct RowError {
    pub row: usize,
    pub reason: ValidationReason,
}

impl RowError {
    pub fn new(row: usize, reason: ValidationReason) -> Self {
        Self { row, reason }
    }
}
