//! The social stats refresh cycle: fetch, read, merge, stamp, write.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use folio_core::{merge_snapshot, CandidateSnapshot, MergeResult, Platform, StatsSnapshot};
use folio_db::{KvStore, SnapshotStore};
use folio_scraper::SocialClient;
use tokio::sync::Mutex;

/// Conditional writes attempted before falling back to an unconditional one.
const MAX_CAS_ATTEMPTS: u32 = 3;

/// Result of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// The merged snapshot, written or not.
    pub snapshot: StatsSnapshot,
    /// Platforms whose previous positive count was kept.
    pub preserved: Vec<Platform>,
    pub written: bool,
    pub write_error: Option<String>,
}

/// Runs refresh cycles for the social snapshot.
///
/// Cycles are serialized within the process; concurrent calls queue on an
/// internal guard. Across processes the write is a compare-and-swap on the
/// stored version, re-merging on conflict.
pub struct SocialRefresher {
    client: SocialClient,
    snapshots: SnapshotStore,
    handles: BTreeMap<Platform, String>,
    guard: Mutex<()>,
}

impl SocialRefresher {
    pub fn new(
        client: SocialClient,
        store: Arc<dyn KvStore>,
        handles: BTreeMap<Platform, String>,
    ) -> Self {
        Self {
            client,
            snapshots: SnapshotStore::new(store),
            handles,
            guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn handles(&self) -> &BTreeMap<Platform, String> {
        &self.handles
    }

    #[must_use]
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Run one full cycle. Never fails; failures are logged and reflected in
    /// the outcome.
    pub async fn refresh(&self) -> RefreshOutcome {
        let _guard = self.guard.lock().await;
        let started = Instant::now();

        let candidate = self.client.fetch_all(&self.handles).await;
        let outcome = self.write_merged(&candidate, Utc::now()).await;

        tracing::info!(
            written = outcome.written,
            preserved = %format_preserved(&outcome.preserved),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "social stats refresh finished"
        );
        outcome
    }

    /// Merge an already-fetched candidate into the stored snapshot.
    pub async fn apply_candidate(
        &self,
        candidate: &CandidateSnapshot,
        now: DateTime<Utc>,
    ) -> RefreshOutcome {
        let _guard = self.guard.lock().await;
        self.write_merged(candidate, now).await
    }

    async fn write_merged(&self, candidate: &CandidateSnapshot, now: DateTime<Utc>) -> RefreshOutcome {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let (existing, version) = self.snapshots.read().await;
            let merged = merge_snapshot(existing.as_ref(), candidate, now);

            match self.snapshots.write_if_version(&merged.snapshot, version).await {
                Ok(true) => return written(merged),
                Ok(false) => {
                    tracing::warn!(
                        attempt,
                        expected_version = ?version,
                        "snapshot changed during refresh; re-merging"
                    );
                }
                Err(e) => return failed(merged, &e),
            }
        }

        tracing::warn!(
            attempts = MAX_CAS_ATTEMPTS,
            "snapshot kept changing; falling back to unconditional write"
        );
        let (existing, _) = self.snapshots.read().await;
        let merged = merge_snapshot(existing.as_ref(), candidate, now);
        match self.snapshots.write(&merged.snapshot).await {
            Ok(_) => written(merged),
            Err(e) => failed(merged, &e),
        }
    }
}

fn written(merged: MergeResult) -> RefreshOutcome {
    RefreshOutcome {
        snapshot: merged.snapshot,
        preserved: merged.preserved,
        written: true,
        write_error: None,
    }
}

fn failed(merged: MergeResult, error: &folio_db::DbError) -> RefreshOutcome {
    tracing::error!(error = %error, "snapshot write failed; next cycle will retry");
    RefreshOutcome {
        snapshot: merged.snapshot,
        preserved: merged.preserved,
        written: false,
        write_error: Some(error.to_string()),
    }
}

fn format_preserved(preserved: &[Platform]) -> String {
    if preserved.is_empty() {
        return "none".to_owned();
    }
    preserved
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserved_list_formats_like_log_line() {
        assert_eq!(format_preserved(&[]), "none");
        assert_eq!(
            format_preserved(&[Platform::Youtube, Platform::Twitter]),
            "youtube, twitter"
        );
    }
}
