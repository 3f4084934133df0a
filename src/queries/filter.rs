//! Threshold filter over per-student grade-2 counts

use std::fmt;

use serde::{Deserialize, Serialize};

/// Threshold used by `/students/more-than-3-twos`
pub const DEFAULT_MORE_THAN_THRESHOLD: i64 = 3;

/// Threshold used by `/students/less-than-5-twos`
pub const DEFAULT_FEWER_THAN_THRESHOLD: i64 = 5;

/// Direction of the count comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// count > threshold
    MoreThan,
    /// count < threshold
    FewerThan,
}

impl Comparison {
    /// SQL operator for the HAVING clause.
    ///
    /// Only these two literals are ever spliced into query text.
    pub fn sql_operator(&self) -> &'static str {
        match self {
            Comparison::MoreThan => ">",
            Comparison::FewerThan => "<",
        }
    }

    pub fn matches(&self, count: i64, threshold: i64) -> bool {
        match self {
            Comparison::MoreThan => count > threshold,
            Comparison::FewerThan => count < threshold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::MoreThan => "more_than",
            Comparison::FewerThan => "fewer_than",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keep students whose grade-2 count compares to `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwosFilter {
    pub comparison: Comparison,
    pub threshold: i64,
}

impl TwosFilter {
    pub fn new(comparison: Comparison, threshold: i64) -> Self {
        Self {
            comparison,
            threshold,
        }
    }

    pub fn more_than(threshold: i64) -> Self {
        Self::new(Comparison::MoreThan, threshold)
    }

    pub fn fewer_than(threshold: i64) -> Self {
        Self::new(Comparison::FewerThan, threshold)
    }

    pub fn matches(&self, count: i64) -> bool {
        self.comparison.matches(count, self.threshold)
    }
}
