//! Key/value persistence for snapshots, cached payloads, and rendered cards.
//!
//! Every entry carries a monotonically increasing `version`, bumped on each
//! write, which callers pass back to [`KvStore::compare_and_swap`] to make
//! read-modify-write sequences safe across processes.

mod memory;
mod postgres;
mod snapshot;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::DbError;

pub use memory::MemoryKvStore;
pub use postgres::PgKvStore;
pub use snapshot::{SnapshotStore, VersionedSnapshot};

/// A stored value together with its version token.
#[derive(Debug, Clone, PartialEq)]
pub struct KvEntry {
    pub value: Value,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the entry under `key`, or `None` if it has never been written.
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, DbError>;

    /// Unconditionally write `value`, returning the new version.
    async fn put(&self, key: &str, value: Value) -> Result<i64, DbError>;

    /// Write `value` only if the current version matches `expected_version`.
    ///
    /// `None` means the key must not exist yet. Returns `false` on mismatch
    /// without touching the stored value.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected_version: Option<i64>,
        value: Value,
    ) -> Result<bool, DbError>;

    /// Remove `key`. Returns whether anything was deleted.
    async fn delete(&self, key: &str) -> Result<bool, DbError>;

    async fn health_check(&self) -> Result<(), DbError>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// Read and decode a typed value.
///
/// # Errors
///
/// Returns [`DbError::Decode`] if the stored JSON does not match `T`, or any
/// backend error from [`KvStore::get`].
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, DbError> {
    let Some(entry) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_value(entry.value)
        .map(Some)
        .map_err(|e| DbError::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Serialize and unconditionally write a typed value.
///
/// # Errors
///
/// Returns [`DbError::Json`] if `value` cannot be serialized, or any backend
/// error from [`KvStore::put`].
pub async fn put_json<T: Serialize + Sync>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<i64, DbError> {
    let value = serde_json::to_value(value)?;
    store.put(key, value).await
}
