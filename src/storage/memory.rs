//! In-process grade store
//!
//! Same semantics as the Postgres store, without a server. Used by tests and
//! by `serve --memory` for local front-end work.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::queries::TwosFilter;
use crate::records::{GradeRecord, StudentTwoCount};

use super::errors::{StorageError, StorageResult};
use super::store::GradeStore;

/// Grade store holding records in memory
#[derive(Default)]
pub struct MemoryGradeStore {
    records: Mutex<Vec<GradeRecord>>,
    unavailable: AtomicBool,
    closed: AtomicBool,
}

impl MemoryGradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails as if the database were down
    pub fn with_failure(self) -> Self {
        self.set_unavailable(true);
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of the stored records in insertion order
    pub fn records(&self) -> StorageResult<Vec<GradeRecord>> {
        Ok(self.lock()?.clone())
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("store is closed".into()));
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("connection refused".into()));
        }
        Ok(())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Vec<GradeRecord>>> {
        self.records
            .lock()
            .map_err(|_| StorageError::Unavailable("record lock poisoned".into()))
    }
}

#[async_trait]
impl GradeStore for MemoryGradeStore {
    async fn replace_all(&self, records: &[GradeRecord]) -> StorageResult<u64> {
        self.check_available()?;
        let replacement = records.to_vec();
        *self.lock()? = replacement;
        Ok(records.len() as u64)
    }

    async fn count_twos(&self, filter: TwosFilter) -> StorageResult<Vec<StudentTwoCount>> {
        self.check_available()?;

        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for record in self.lock()?.iter().filter(|r| r.is_two()) {
            *counts.entry(record.full_name.clone()).or_default() += 1;
        }

        let mut students: Vec<StudentTwoCount> = counts
            .into_iter()
            .filter(|(_, count)| filter.matches(*count))
            .map(|(full_name, count_twos)| StudentTwoCount {
                full_name,
                count_twos,
            })
            .collect();

        students.sort_by(|a, b| {
            b.count_twos
                .cmp(&a.count_twos)
                .then_with(|| a.full_name.cmp(&b.full_name))
        });
        Ok(students)
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.check_available()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Grade;
    use chrono::NaiveDate;

    fn record(name: &str, grade: i64) -> GradeRecord {
        GradeRecord::new(
            NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
            "М-3",
            name,
            Grade::try_from(grade).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_replace_discards_previous() {
        let store = MemoryGradeStore::new();
        store
            .replace_all(&[record("Старый", 2), record("Старый", 3)])
            .await
            .unwrap();
        store.replace_all(&[record("Новый", 4)]).await.unwrap();

        let stored = store.records().unwrap();
        assert_eq!(stored, vec![record("Новый", 4)]);
    }

    #[tokio::test]
    async fn test_duplicates_counted_separately() {
        let store = MemoryGradeStore::new();
        let dup = record("Кузнецов", 2);
        store
            .replace_all(&[dup.clone(), dup.clone(), dup.clone(), dup])
            .await
            .unwrap();

        let result = store.count_twos(TwosFilter::more_than(3)).await.unwrap();
        assert_eq!(result, vec![StudentTwoCount::new("Кузнецов", 4)]);
    }

    #[tokio::test]
    async fn test_only_twos_are_counted() {
        let store = MemoryGradeStore::new();
        store
            .replace_all(&[record("Лебедев", 3), record("Лебедев", 5)])
            .await
            .unwrap();

        let result = store.count_twos(TwosFilter::fewer_than(5)).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_failure_leaves_contents() {
        let store = MemoryGradeStore::new();
        store.replace_all(&[record("Морозов", 2)]).await.unwrap();

        store.set_unavailable(true);
        assert!(store.replace_all(&[record("Другой", 3)]).await.is_err());
        assert!(store.health_check().await.is_err());

        store.set_unavailable(false);
        assert_eq!(store.records().unwrap(), vec![record("Морозов", 2)]);
    }

    #[tokio::test]
    async fn test_closed_store_rejects_calls() {
        let store = MemoryGradeStore::new();
        store.close().await;
        assert!(store.health_check().await.is_err());
    }
}
