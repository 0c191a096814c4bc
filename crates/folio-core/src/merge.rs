//! Last-known-good merge between a stored snapshot and a fresh scrape.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::stats::{CandidateSnapshot, Platform, PlatformStat, StatsSnapshot};

/// Outcome of [`merge_snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub snapshot: StatsSnapshot,
    /// Platforms whose stored stat was kept in place of a zero/error candidate.
    pub preserved: Vec<Platform>,
}

/// Resolve one platform's stat.
///
/// A missing, failed, or zero candidate never replaces an existing positive
/// count. In every other case the candidate wins, including when it is
/// missing and there is nothing worth keeping.
#[must_use]
pub fn merge_stat(
    existing: Option<&PlatformStat>,
    candidate: Option<&PlatformStat>,
) -> Option<PlatformStat> {
    let candidate_is_bad = candidate.map_or(true, |c| c.error.is_some() || c.count == 0);

    match existing {
        Some(existing) if candidate_is_bad && existing.is_known_good() => Some(existing.clone()),
        _ => candidate.cloned(),
    }
}

/// Merge `candidate` into `existing` platform by platform and stamp `now`.
///
/// Platforms are resolved independently over the union of both key sets, so a
/// platform dropped from configuration keeps its last good value.
#[must_use]
pub fn merge_snapshot(
    existing: Option<&StatsSnapshot>,
    candidate: &CandidateSnapshot,
    now: DateTime<Utc>,
) -> MergeResult {
    let platforms: BTreeSet<Platform> = candidate
        .keys()
        .chain(existing.iter().flat_map(|s| s.stats.keys()))
        .copied()
        .collect();

    let mut stats = std::collections::BTreeMap::new();
    let mut preserved = Vec::new();

    for platform in platforms {
        let old = existing.and_then(|s| s.get(platform));
        let new = candidate.get(&platform);
        let Some(merged) = merge_stat(old, new) else {
            continue;
        };
        if old.is_some_and(|o| o.is_known_good() && *o == merged && new != Some(&merged)) {
            preserved.push(platform);
        }
        stats.insert(platform, merged);
    }

    MergeResult {
        snapshot: StatsSnapshot::new(now, stats),
        preserved,
    }
}
