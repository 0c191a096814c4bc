//! Test doubles shared by the refresh integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use folio_db::{DbError, KvEntry, KvStore, MemoryKvStore};
use serde_json::Value;

pub fn backend_down() -> DbError {
    DbError::Sqlx(sqlx::Error::PoolTimedOut)
}

/// Delegates to an in-memory store, but simulates another process writing
/// `interloper` under the same key right before each of the first
/// `conflicts` compare-and-swap calls.
pub struct ConflictingStore {
    pub inner: Arc<MemoryKvStore>,
    interloper: Value,
    remaining: AtomicU32,
    pub cas_calls: AtomicU32,
}

impl ConflictingStore {
    pub fn new(inner: Arc<MemoryKvStore>, interloper: Value, conflicts: u32) -> Self {
        Self {
            inner,
            interloper,
            remaining: AtomicU32::new(conflicts),
            cas_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl KvStore for ConflictingStore {
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, DbError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Value) -> Result<i64, DbError> {
        self.inner.put(key, value).await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected_version: Option<i64>,
        value: Value,
    ) -> Result<bool, DbError> {
        self.cas_calls.fetch_add(1, Ordering::SeqCst);
        let left = self.remaining.load(Ordering::SeqCst);
        if left > 0 {
            self.remaining.store(left - 1, Ordering::SeqCst);
            self.inner.put(key, self.interloper.clone()).await?;
        }
        self.inner.compare_and_swap(key, expected_version, value).await
    }

    async fn delete(&self, key: &str) -> Result<bool, DbError> {
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> Result<(), DbError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "conflicting"
    }
}

/// Fails reads, writes, or both.
pub struct FlakyStore {
    pub inner: MemoryKvStore,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FlakyStore {
    pub fn new(fail_reads: bool, fail_writes: bool) -> Self {
        Self {
            inner: MemoryKvStore::new(),
            fail_reads,
            fail_writes,
        }
    }
}

#[async_trait]
impl KvStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, DbError> {
        if self.fail_reads {
            return Err(backend_down());
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Value) -> Result<i64, DbError> {
        if self.fail_writes {
            return Err(backend_down());
        }
        self.inner.put(key, value).await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected_version: Option<i64>,
        value: Value,
    ) -> Result<bool, DbError> {
        if self.fail_writes {
            return Err(backend_down());
        }
        self.inner.compare_and_swap(key, expected_version, value).await
    }

    async fn delete(&self, key: &str) -> Result<bool, DbError> {
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> Result<(), DbError> {
        Err(backend_down())
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}
