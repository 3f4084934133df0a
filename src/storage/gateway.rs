//! Storage Gateway
//!
//! Thin statement runner over a bounded Postgres connection pool.
//!
//! The pool is the only shared mutable resource in the service. Requests
//! beyond `max_connections` queue for a connection until
//! `acquire_timeout_secs` expires.

use std::time::Duration;

use chrono::NaiveDate;
use sqlx::postgres::{PgArguments, PgConnection, PgPool, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, QueryBuilder, Transaction};

use super::config::StorageConfig;
use super::errors::{StorageError, StorageResult};

/// Postgres caps a single statement at 65535 bind parameters
pub const MAX_BIND_PARAMS: usize = 65_535;

/// A statement argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Int(i32),
    BigInt(i64),
    Date(NaiveDate),
}

fn bind_args<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    args: &'q [SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    for arg in args {
        query = match arg {
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::BigInt(v) => query.bind(*v),
            SqlValue::Date(v) => query.bind(*v),
        };
    }
    query
}

/// Multi-row INSERT in chunks that stay under `MAX_BIND_PARAMS`.
///
/// `insert_prefix` is everything before `VALUES`, e.g.
/// `INSERT INTO grades (date, grade) `. Rows are inserted in slice order.
async fn insert_rows(
    conn: &mut PgConnection,
    insert_prefix: &str,
    rows: &[Vec<SqlValue>],
) -> StorageResult<u64> {
    let width = match rows.first() {
        Some(first) => first.len(),
        None => return Ok(0),
    };
    if width == 0 || rows.iter().any(|row| row.len() != width) {
        return Err(StorageError::InvalidStatement(
            "bulk insert rows must be non-empty and equally wide".into(),
        ));
    }

    let rows_per_chunk = (MAX_BIND_PARAMS / width).max(1);
    let mut inserted = 0;

    for chunk in rows.chunks(rows_per_chunk) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(insert_prefix);
        builder.push_values(chunk, |mut values, row| {
            for value in row {
                match value {
                    SqlValue::Text(v) => {
                        values.push_bind(v.clone());
                    }
                    SqlValue::Int(v) => {
                        values.push_bind(*v);
                    }
                    SqlValue::BigInt(v) => {
                        values.push_bind(*v);
                    }
                    SqlValue::Date(v) => {
                        values.push_bind(*v);
                    }
                }
            }
        });
        inserted += builder.build().execute(&mut *conn).await?.rows_affected();
    }

    Ok(inserted)
}

/// Pooled access to the grades database
#[derive(Clone)]
pub struct StorageGateway {
    pool: PgPool,
}

impl StorageGateway {
    /// Open the pool. Fails if the first `min_connections` cannot be established.
    pub async fn connect(config: &StorageConfig) -> StorageResult<Self> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run a statement, returning the affected row count
    pub async fn execute(&self, statement: &str, args: &[SqlValue]) -> StorageResult<u64> {
        let result = bind_args(sqlx::query(statement), args)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn fetch_all(&self, query: &str, args: &[SqlValue]) -> StorageResult<Vec<PgRow>> {
        Ok(bind_args(sqlx::query(query), args)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn fetch_one(&self, query: &str, args: &[SqlValue]) -> StorageResult<Option<PgRow>> {
        Ok(bind_args(sqlx::query(query), args)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Insert all rows in one transaction
    pub async fn bulk_insert(
        &self,
        insert_prefix: &str,
        rows: &[Vec<SqlValue>],
    ) -> StorageResult<u64> {
        let mut tx = self.begin().await?;
        let inserted = tx.bulk_insert(insert_prefix, rows).await?;
        tx.commit().await?;
        Ok(inserted)
    }

    /// Run `clear_statement` then insert `rows`, all in one transaction.
    ///
    /// Any failure rolls back, leaving the previous contents in place.
    pub async fn replace_all(
        &self,
        clear_statement: &str,
        insert_prefix: &str,
        rows: &[Vec<SqlValue>],
    ) -> StorageResult<u64> {
        let mut tx = self.begin().await?;
        tx.execute(clear_statement, &[]).await?;
        let inserted = tx.bulk_insert(insert_prefix, rows).await?;
        tx.commit().await?;
        Ok(inserted)
    }

    /// Start a transaction. Dropping it without `commit` rolls back.
    pub async fn begin(&self) -> StorageResult<GatewayTransaction> {
        Ok(GatewayTransaction {
            tx: self.pool.begin().await?,
        })
    }

    /// Close every connection; pending checkouts fail
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// Execute and bulk insert inside one database transaction
pub struct GatewayTransaction {
    tx: Transaction<'static, Postgres>,
}

impl GatewayTransaction {
    pub async fn execute(&mut self, statement: &str, args: &[SqlValue]) -> StorageResult<u64> {
        let result = bind_args(sqlx::query(statement), args)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn bulk_insert(
        &mut self,
        insert_prefix: &str,
        rows: &[Vec<SqlValue>],
    ) -> StorageResult<u64> {
        insert_rows(&mut *self.tx, insert_prefix, rows).await
    }

    pub async fn commit(self) -> StorageResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> StorageResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_value_equality() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(SqlValue::Date(date), SqlValue::Date(date));
        assert_ne!(SqlValue::Int(2), SqlValue::BigInt(2));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let config = StorageConfig {
            database_url: "   ".to_string(),
            ..Default::default()
        };
        let result = StorageGateway::connect(&config).await;
        assert!(matches!(result, Err(StorageError::InvalidConfig(_))));
    }
}
