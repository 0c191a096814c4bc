use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{KvEntry, KvStore};
use crate::DbError;

/// Process-local store used in development and tests. Contents are lost on
/// restart.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, KvEntry>>,
}

impl MemoryKvStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, DbError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<i64, DbError> {
        let mut entries = self.entries.write().await;
        let version = entries.get(key).map_or(1, |e| e.version + 1);
        entries.insert(
            key.to_string(),
            KvEntry {
                value,
                version,
                updated_at: Utc::now(),
            },
        );
        Ok(version)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected_version: Option<i64>,
        value: Value,
    ) -> Result<bool, DbError> {
        let mut entries = self.entries.write().await;
        let current = entries.get(key).map(|e| e.version);
        if current != expected_version {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            KvEntry {
                value,
                version: current.map_or(1, |v| v + 1),
                updated_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool, DbError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn health_check(&self) -> Result<(), DbError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
