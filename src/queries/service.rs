//! Aggregate query service

use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::records::StudentTwoCount;
use crate::storage::{GradeStore, StorageResult};

use super::filter::TwosFilter;

/// Read-only grouping queries over the stored records.
///
/// Results are recomputed on every call; nothing is cached.
#[derive(Clone)]
pub struct GradeQueryService {
    store: Arc<dyn GradeStore>,
}

impl GradeQueryService {
    pub fn new(store: Arc<dyn GradeStore>) -> Self {
        Self { store }
    }

    /// Students whose grade-2 count passes `filter`.
    ///
    /// Ordered by count descending, then full name ascending.
    pub async fn students_by_twos(&self, filter: TwosFilter) -> StorageResult<Vec<StudentTwoCount>> {
        let comparison = filter.comparison.to_string();
        let threshold = filter.threshold.to_string();

        match self.store.count_twos(filter).await {
            Ok(students) => {
                log_event_with_fields(
                    Event::QueryExecuted,
                    &[
                        ("comparison", &comparison),
                        ("rows", &students.len().to_string()),
                        ("threshold", &threshold),
                    ],
                );
                Ok(students)
            }
            Err(e) => {
                Logger::error(
                    Event::QueryFailed.as_str(),
                    &[
                        ("comparison", &comparison),
                        ("error", &e.to_string()),
                        ("threshold", &threshold),
                    ],
                );
                Err(e)
            }
        }
    }

    pub async fn students_with_more_than_n_twos(&self, n: i64) -> StorageResult<Vec<StudentTwoCount>> {
        self.students_by_twos(TwosFilter::more_than(n)).await
    }

    pub async fn students_with_fewer_than_n_twos(&self, n: i64) -> StorageResult<Vec<StudentTwoCount>> {
        self.students_by_twos(TwosFilter::fewer_than(n)).await
    }
}
