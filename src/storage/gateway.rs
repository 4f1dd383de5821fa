//! The persistence gateway.
//!
//! Executes statements produced by [`crate::query::builder`] against a SQLite pool. This is
//! the only module that talks to the driver; nothing above it sees `sqlx` types except
//! through [`StoreError`].

use crate::domain::condition::Scalar;
use crate::error::StoreError;
use crate::query::builder::Statement;
use serde_json::{Map, Number, Value as JsonValue};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, Sqlite, SqlitePool, TypeInfo, ValueRef};
use std::str::FromStr;
use tracing::{debug, error, info};

/// One result row: column name to value, in store column order.
pub type Record = Map<String, JsonValue>;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

#[derive(Clone)]
pub struct Gateway {
    pool: SqlitePool,
}

impl Gateway {
    /// Opens a pool for `database_url`, creating the database file if needed.
    ///
    /// In-memory databases live and die with their connection, so they get exactly one
    /// connection that is never recycled.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        info!(target: "database", in_memory, "connected to {}", database_url);
        Ok(Self { pool })
    }

    /// Runs a statement without parameters (DDL).
    pub async fn execute_script(&self, sql: &str) -> Result<(), StoreError> {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| fail(sql, e))?;
        Ok(())
    }

    /// Inserts every row inside one transaction and returns the generated ids in input order.
    ///
    /// Any failure rolls the whole batch back.
    pub async fn insert_many(&self, sql: &str, rows: &[Vec<Scalar>]) -> Result<Vec<i64>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| fail("BEGIN", e))?;
        let mut ids = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let result = bind_all(sqlx::query(sql), row).execute(&mut *tx).await;
            match result {
                Ok(result) => ids.push(result.last_insert_rowid()),
                Err(e) => {
                    if let Err(rollback) = tx.rollback().await {
                        error!(target: "database", "rollback failed: {}", rollback);
                    }
                    error!(target: "database", row = index, "insert batch rolled back");
                    return Err(fail(sql, e));
                }
            }
        }

        tx.commit().await.map_err(|e| fail("COMMIT", e))?;
        debug!(target: "database", rows = ids.len(), "{}", sql);
        Ok(ids)
    }

    /// Runs a SELECT and returns every row as a [`Record`].
    pub async fn select(&self, statement: &Statement) -> Result<Vec<Record>, StoreError> {
        let rows = bind_all(sqlx::query(&statement.sql), &statement.params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| fail(&statement.sql, e))?;

        let records = rows
            .iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| fail(&statement.sql, e))?;
        debug!(target: "database", rows = records.len(), "{}", statement.sql);
        Ok(records)
    }

    /// Runs an UPDATE and returns the number of affected rows.
    pub async fn update(&self, statement: &Statement) -> Result<u64, StoreError> {
        self.execute(statement).await
    }

    /// Runs a DELETE and returns the number of affected rows.
    pub async fn delete(&self, statement: &Statement) -> Result<u64, StoreError> {
        self.execute(statement).await
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| fail("SELECT 1", e))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        let result = bind_all(sqlx::query(&statement.sql), &statement.params)
            .execute(&self.pool)
            .await
            .map_err(|e| fail(&statement.sql, e))?;
        debug!(target: "database", rows = result.rows_affected(), "{}", statement.sql);
        Ok(result.rows_affected())
    }
}

fn fail(statement: &str, source: sqlx::Error) -> StoreError {
    error!(target: "database", "error executing `{}`: {}", statement, source);
    StoreError::new(statement, source)
}

fn bind_all<'q>(mut query: SqliteQuery<'q>, params: &'q [Scalar]) -> SqliteQuery<'q> {
    for param in params {
        query = match param {
            Scalar::Null => query.bind(None::<String>),
            Scalar::Text(s) => query.bind(s.as_str()),
            Scalar::Integer(i) => query.bind(*i),
            Scalar::Date(d) => query.bind(*d),
        };
    }
    query
}

/// Converts a row using the storage class of each value, since SQLite columns are not
/// strictly typed. Dates come back as their stored `YYYY-MM-DD` text.
fn row_to_record(row: &SqliteRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();
    for (i, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(i)?;
        let value = if raw.is_null() {
            JsonValue::Null
        } else {
            let kind = raw.type_info().name().to_ascii_uppercase();
            match kind.as_str() {
                "INTEGER" | "INT" | "BIGINT" | "BOOLEAN" => JsonValue::from(row.try_get::<i64, _>(i)?),
                "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => Number::from_f64(row.try_get::<f64, _>(i)?)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null),
                "BLOB" => {
                    let bytes: Vec<u8> = row.try_get(i)?;
                    JsonValue::String(String::from_utf8_lossy(&bytes).into_owned())
                }
                _ => JsonValue::String(row.try_get::<String, _>(i)?),
            }
        };
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}
