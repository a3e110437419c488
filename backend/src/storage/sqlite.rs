//! # SQLite Record Store
//!
//! The bundled [`RecordStore`] implementation. Each entity collection is a
//! two-column table (`id`, `data`) holding one JSON record per row, which
//! keeps the store schema-stable while entity shapes evolve.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

use super::error::{StoreError, StoreErrorKind};
use super::store::{tables, RecordStore};

/// SqliteRecordStore manages the local database backing the record store
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: Arc<SqlitePool>,
}

impl SqliteRecordStore {
    /// Create a new store, creating the database and schema if needed
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        for table in tables::ALL {
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id TEXT PRIMARY KEY,
                    data TEXT NOT NULL
                );",
                table
            ))
            .execute(pool)
            .await?;
        }

        Ok(())
    }

    /// Map a sqlx failure onto the wire error classification
    fn classify(err: sqlx::Error) -> StoreError {
        match &err {
            sqlx::Error::RowNotFound => {
                return StoreError::new(StoreErrorKind::RowMissing, "no rows returned")
            }
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                return StoreError::new(StoreErrorKind::Unavailable, err.to_string())
            }
            _ => {}
        }

        let message = err.to_string();
        if message.contains("no such table") {
            StoreError::new(StoreErrorKind::TableMissing, message)
        } else if message.contains("no such column") {
            StoreError::new(StoreErrorKind::ColumnMissing, message)
        } else {
            StoreError::new(StoreErrorKind::Backend, message)
        }
    }

    fn decode(raw: String) -> Result<Value, StoreError> {
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::new(StoreErrorKind::Backend, format!("corrupt record: {}", e)))
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn fetch_all(&self, table: &str) -> Result<Vec<Value>, StoreError> {
        let rows = sqlx::query(&format!("SELECT data FROM {}", table))
            .fetch_all(&*self.pool)
            .await
            .map_err(Self::classify)?;

        rows.into_iter()
            .map(|row| Self::decode(row.get::<String, _>("data")))
            .collect()
    }

    async fn fetch_one(&self, table: &str, id: &str) -> Result<Value, StoreError> {
        let row = sqlx::query(&format!("SELECT data FROM {} WHERE id = ?1", table))
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(Self::classify)?;

        match row {
            Some(row) => Self::decode(row.get::<String, _>("data")),
            None => Err(StoreError::new(
                StoreErrorKind::RowMissing,
                format!("no row with id {} in {}", id, table),
            )),
        }
    }

    async fn upsert(&self, table: &str, id: &str, record: Value) -> Result<(), StoreError> {
        let data = record.to_string();
        sqlx::query(&format!(
            "INSERT INTO {} (id, data) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data",
            table
        ))
        .bind(id)
        .bind(data)
        .execute(&*self.pool)
        .await
        .map_err(Self::classify)?;

        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query(&format!("DELETE FROM {} WHERE id = ?1", table))
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(Self::classify)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_fetch_roundtrip() {
        let store = SqliteRecordStore::init_test().await.expect("Failed to create test store");

        let record = json!({"id": "plan::1", "program_name": "Football League"});
        store
            .upsert(tables::PLANS, "plan::1", record.clone())
            .await
            .expect("Failed to upsert");

        let all = store.fetch_all(tables::PLANS).await.expect("Failed to fetch");
        assert_eq!(all, vec![record.clone()]);

        let one = store
            .fetch_one(tables::PLANS, "plan::1")
            .await
            .expect("Failed to fetch one");
        assert_eq!(one, record);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_row() {
        let store = SqliteRecordStore::init_test().await.expect("Failed to create test store");

        store
            .upsert(tables::PLANS, "plan::1", json!({"id": "plan::1", "status": "Pending"}))
            .await
            .expect("Failed to upsert");
        store
            .upsert(tables::PLANS, "plan::1", json!({"id": "plan::1", "status": "Executed"}))
            .await
            .expect("Failed to upsert again");

        let all = store.fetch_all(tables::PLANS).await.expect("Failed to fetch");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["status"], "Executed");
    }

    #[tokio::test]
    async fn test_fetch_one_missing_row() {
        let store = SqliteRecordStore::init_test().await.expect("Failed to create test store");

        let err = store
            .fetch_one(tables::SETTINGS, "1")
            .await
            .expect_err("Expected missing row error");
        assert_eq!(err.kind, StoreErrorKind::RowMissing);
        assert!(err.is_schema_mismatch());
    }

    #[tokio::test]
    async fn test_missing_table_classified_as_schema_mismatch() {
        let store = SqliteRecordStore::init_test().await.expect("Failed to create test store");

        let err = store
            .fetch_all("not_a_table")
            .await
            .expect_err("Expected missing table error");
        assert_eq!(err.kind, StoreErrorKind::TableMissing);
    }

    #[tokio::test]
    async fn test_delete_absent_id_is_not_an_error() {
        let store = SqliteRecordStore::init_test().await.expect("Failed to create test store");

        store
            .delete(tables::MEMBERS, "member::missing")
            .await
            .expect("Delete of absent id should succeed");
    }
}
