use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use super::{KvEntry, KvStore};
use crate::DbError;

/// A row from the `kv_entries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct KvRow {
    value: Value,
    version: i64,
    updated_at: DateTime<Utc>,
}

impl From<KvRow> for KvEntry {
    fn from(row: KvRow) -> Self {
        Self {
            value: row.value,
            version: row.version,
            updated_at: row.updated_at,
        }
    }
}

/// Postgres-backed store over the `kv_entries` table.
#[derive(Debug, Clone)]
pub struct PgKvStore {
    pool: PgPool,
}

impl PgKvStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl KvStore for PgKvStore {
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, DbError> {
        let row = sqlx::query_as::<_, KvRow>(
            "SELECT value, version, updated_at FROM kv_entries WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(KvEntry::from))
    }

    async fn put(&self, key: &str, value: Value) -> Result<i64, DbError> {
        let version = sqlx::query_scalar::<_, i64>(
            "INSERT INTO kv_entries (key, value) \
             VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE \
             SET value = EXCLUDED.value, \
                 version = kv_entries.version + 1, \
                 updated_at = NOW() \
             RETURNING version",
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        Ok(version)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected_version: Option<i64>,
        value: Value,
    ) -> Result<bool, DbError> {
        let result = match expected_version {
            None => {
                sqlx::query(
                    "INSERT INTO kv_entries (key, value) VALUES ($1, $2) \
                     ON CONFLICT (key) DO NOTHING",
                )
                .bind(key)
                .bind(value)
                .execute(&self.pool)
                .await?
            }
            Some(version) => {
                sqlx::query(
                    "UPDATE kv_entries \
                     SET value = $2, version = version + 1, updated_at = NOW() \
                     WHERE key = $1 AND version = $3",
                )
                .bind(key)
                .bind(value)
                .bind(version)
                .execute(&self.pool)
                .await?
            }
        };

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, key: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM kv_entries WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DbError> {
        crate::ping(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
