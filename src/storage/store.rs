//! Grade store trait

use async_trait::async_trait;

use crate::queries::TwosFilter;
use crate::records::{GradeRecord, StudentTwoCount};

use super::errors::StorageResult;

/// Persistence seam used by ingestion and the aggregate queries.
///
/// Implementations must make `replace_all` atomic: a reader sees either the
/// previous contents or the complete new batch, never a mix or an empty
/// table in between.
#[async_trait]
pub trait GradeStore: Send + Sync {
    /// Discard every stored record and insert `records` in order.
    ///
    /// Returns the number of records inserted.
    async fn replace_all(&self, records: &[GradeRecord]) -> StorageResult<u64>;

    /// Per-student grade-2 counts passing `filter`, ordered by count
    /// descending then full name ascending
    async fn count_twos(&self, filter: TwosFilter) -> StorageResult<Vec<StudentTwoCount>>;

    /// Check connectivity
    async fn health_check(&self) -> StorageResult<()>;

    /// Release backend resources. Calls after `close` fail.
    async fn close(&self);
}
