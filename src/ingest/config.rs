//! Ingestion Configuration
//!
//! Column labels, accepted file extension and date formats for uploads.

use serde::{Deserialize, Serialize};

use crate::records::{DateFormats, RecordField};

/// Required header labels, matched exactly after trimming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLabels {
    #[serde(default = "default_date_label")]
    pub date: String,

    #[serde(default = "default_group_number_label")]
    pub group_number: String,

    #[serde(default = "default_full_name_label")]
    pub full_name: String,

    #[serde(default = "default_grade_label")]
    pub grade: String,
}

fn default_date_label() -> String {
    "Дата".to_string()
}

fn default_group_number_label() -> String {
    "Номер группы".to_string()
}

fn default_full_name_label() -> String {
    "ФИО".to_string()
}

fn default_grade_label() -> String {
    "Оценка".to_string()
}

impl Default for HeaderLabels {
    fn default() -> Self {
        Self {
            date: default_date_label(),
            group_number: default_group_number_label(),
            full_name: default_full_name_label(),
            grade: default_grade_label(),
        }
    }
}

impl HeaderLabels {
    pub fn label(&self, field: RecordField) -> &str {
        match field {
            RecordField::Date => &self.date,
            RecordField::GroupNumber => &self.group_number,
            RecordField::FullName => &self.full_name,
            RecordField::Grade => &self.grade,
        }
    }

    /// All four labels in column order
    pub fn required(&self) -> Vec<String> {
        RecordField::ALL
            .iter()
            .map(|field| self.label(*field).to_string())
            .collect()
    }
}

/// Upload parsing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub headers: HeaderLabels,

    /// Required filename suffix (default: ".csv")
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default)]
    pub date_formats: DateFormats,
}

fn default_extension() -> String {
    ".csv".to_string()
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            headers: HeaderLabels::default(),
            extension: default_extension(),
            date_formats: DateFormats::default(),
        }
    }
}

impl IngestConfig {
    /// Case-sensitive suffix check on the uploaded filename
    pub fn accepts_filename(&self, filename: &str) -> bool {
        filename.ends_with(&self.extension)
    }
}
