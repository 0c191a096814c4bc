use std::sync::Arc;

use folio_core::{StatsSnapshot, SOCIAL_SNAPSHOT_KEY};
use serde_json::Value;

use super::KvStore;
use crate::DbError;

/// A decoded social snapshot and the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedSnapshot {
    pub snapshot: StatsSnapshot,
    pub version: i64,
}

/// Typed access to the social stats snapshot stored under a single key.
#[derive(Clone)]
pub struct SnapshotStore {
    store: Arc<dyn KvStore>,
    key: String,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_key(store, SOCIAL_SNAPSHOT_KEY)
    }

    pub fn with_key(store: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the current snapshot for merging.
    ///
    /// Backend failures and undecodable payloads are logged and reported as
    /// absent; the refresh then proceeds as a first run. The version of an
    /// undecodable entry is still returned so a later write can replace it.
    pub async fn read(&self) -> (Option<StatsSnapshot>, Option<i64>) {
        let entry = match self.store.get(&self.key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return (None, None),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "snapshot read failed; treating as absent");
                return (None, None);
            }
        };

        match StatsSnapshot::from_value(&entry.value) {
            Ok(snapshot) => (Some(snapshot), Some(entry.version)),
            Err(reason) => {
                tracing::warn!(key = %self.key, %reason, "stored snapshot is malformed; treating as absent");
                (None, Some(entry.version))
            }
        }
    }

    /// Read the decoded snapshot with its version, propagating failures.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on backend failure or [`DbError::Decode`] when the
    /// stored payload is not a valid snapshot.
    pub async fn read_versioned(&self) -> Result<Option<VersionedSnapshot>, DbError> {
        let Some(entry) = self.store.get(&self.key).await? else {
            return Ok(None);
        };
        let snapshot = StatsSnapshot::from_value(&entry.value).map_err(|reason| DbError::Decode {
            key: self.key.clone(),
            reason,
        })?;
        Ok(Some(VersionedSnapshot {
            snapshot,
            version: entry.version,
        }))
    }

    /// The stored JSON exactly as written, for serving verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on backend failure.
    pub async fn load_raw(&self) -> Result<Option<Value>, DbError> {
        Ok(self.store.get(&self.key).await?.map(|entry| entry.value))
    }

    /// Write `snapshot` only if the stored version still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on backend failure.
    pub async fn write_if_version(
        &self,
        snapshot: &StatsSnapshot,
        expected: Option<i64>,
    ) -> Result<bool, DbError> {
        self.store
            .compare_and_swap(&self.key, expected, snapshot.to_value())
            .await
    }

    /// Overwrite the stored snapshot unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on backend failure.
    pub async fn write(&self, snapshot: &StatsSnapshot) -> Result<i64, DbError> {
        self.store.put(&self.key, snapshot.to_value()).await
    }
}
