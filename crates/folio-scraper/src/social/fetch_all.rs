use std::collections::BTreeMap;

use folio_core::{CandidateSnapshot, Platform};
use futures::future::join_all;

use super::SocialClient;

impl SocialClient {
    /// Scrape every configured platform concurrently and wait for all of them.
    ///
    /// Produces exactly one stat per entry in `handles`. A failing platform
    /// never affects the others; its failure is recorded in its own stat.
    pub async fn fetch_all(&self, handles: &BTreeMap<Platform, String>) -> CandidateSnapshot {
        let fetches = handles.iter().map(|(&platform, handle)| async move {
            (platform, self.fetch(platform, handle).await)
        });

        let candidate: CandidateSnapshot = join_all(fetches).await.into_iter().collect();

        let failed = candidate.values().filter(|s| s.error.is_some()).count();
        tracing::info!(
            platforms = candidate.len(),
            failed,
            "social fetch completed"
        );
        candidate
    }
}
