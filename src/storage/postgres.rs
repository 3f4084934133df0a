//! PostgreSQL-backed grade store

use async_trait::async_trait;
use sqlx::Row;

use crate::queries::{Comparison, TwosFilter};
use crate::records::{Grade, GradeRecord, StudentTwoCount};

use super::config::StorageConfig;
use super::errors::StorageResult;
use super::gateway::{SqlValue, StorageGateway};
use super::store::GradeStore;

/// Creates the table on first start. Existing tables are left untouched.
const CREATE_GRADES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS grades (
        id SERIAL PRIMARY KEY,
        date DATE NOT NULL,
        group_number TEXT NOT NULL,
        full_name TEXT NOT NULL,
        grade INTEGER NOT NULL CHECK (grade BETWEEN 2 AND 5)
    )
"#;

const CLEAR_GRADES: &str = "TRUNCATE TABLE grades";

const INSERT_GRADES: &str = "INSERT INTO grades (date, group_number, full_name, grade) ";

fn count_twos_query(comparison: Comparison) -> String {
    format!(
        r#"
        SELECT full_name, COUNT(*) AS count_twos
        FROM grades
        WHERE grade = $1
        GROUP BY full_name
        HAVING COUNT(*) {} $2
        ORDER BY count_twos DESC, full_name
        "#,
        comparison.sql_operator()
    )
}

fn record_values(record: &GradeRecord) -> Vec<SqlValue> {
    vec![
        SqlValue::Date(record.date),
        SqlValue::Text(record.group_number.clone()),
        SqlValue::Text(record.full_name.clone()),
        SqlValue::Int(record.grade.value() as i32),
    ]
}

/// Grade store over a pooled Postgres connection
pub struct PostgresGradeStore {
    gateway: StorageGateway,
}

impl PostgresGradeStore {
    /// Open the pool and make sure the `grades` table exists
    pub async fn connect(config: &StorageConfig) -> StorageResult<Self> {
        let gateway = StorageGateway::connect(config).await?;
        let store = Self { gateway };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn gateway(&self) -> &StorageGateway {
        &self.gateway
    }

    pub async fn ensure_schema(&self) -> StorageResult<()> {
        self.gateway.execute(CREATE_GRADES_TABLE, &[]).await?;
        Ok(())
    }
}

#[async_trait]
impl GradeStore for PostgresGradeStore {
    async fn replace_all(&self, records: &[GradeRecord]) -> StorageResult<u64> {
        let rows: Vec<Vec<SqlValue>> = records.iter().map(record_values).collect();

        // TRUNCATE takes an exclusive lock, so concurrent uploads queue here
        // until the replacing transaction ends.
        self.gateway
            .replace_all(CLEAR_GRADES, INSERT_GRADES, &rows)
            .await
    }

    async fn count_twos(&self, filter: TwosFilter) -> StorageResult<Vec<StudentTwoCount>> {
        let query = count_twos_query(filter.comparison);
        let args = [
            SqlValue::Int(Grade::TWO.value() as i32),
            SqlValue::BigInt(filter.threshold),
        ];

        let rows = self.gateway.fetch_all(&query, &args).await?;
        let mut students = Vec::with_capacity(rows.len());
        for row in rows {
            students.push(StudentTwoCount {
                full_name: row.try_get("full_name")?,
                count_twos: row.try_get("count_twos")?,
            });
        }
        Ok(students)
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.gateway.fetch_one("SELECT 1", &[]).await?;
        Ok(())
    }

    async fn close(&self) {
        self.gateway.close().await;
    }
}
