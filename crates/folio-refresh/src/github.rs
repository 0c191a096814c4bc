//! GitHub profile stats refresh: repos, stars, activity, languages, cards.

use std::sync::Arc;

use chrono::Utc;
use folio_core::{
    GithubRecord, GITHUB_LANGUAGES_SVG_KEY, GITHUB_STATS_KEY, GITHUB_STATS_SVG_KEY,
};
use folio_db::{get_json, put_json, KvStore};
use folio_scraper::GithubClient;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::RefreshError;
use crate::svg::{render_languages_card, render_stats_card};

/// What a GitHub refresh did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubOutcome {
    /// The record written, `None` when the cycle was skipped.
    pub record: Option<GithubRecord>,
    pub stats_updated: bool,
    pub languages_updated: bool,
}

impl GithubOutcome {
    fn skipped() -> Self {
        Self {
            record: None,
            stats_updated: false,
            languages_updated: false,
        }
    }

    #[must_use]
    pub fn was_skipped(&self) -> bool {
        self.record.is_none()
    }
}

pub struct GithubRefresher {
    client: GithubClient,
    store: Arc<dyn KvStore>,
    username: String,
    top_langs: usize,
    guard: Mutex<()>,
}

impl GithubRefresher {
    pub fn new(
        client: GithubClient,
        store: Arc<dyn KvStore>,
        username: impl Into<String>,
        top_langs: usize,
    ) -> Self {
        Self {
            client,
            store,
            username: username.into(),
            top_langs,
            guard: Mutex::new(()),
        }
    }

    /// Fetch and store fresh stats and cards.
    ///
    /// Skips the whole cycle, writing nothing, when the repository list is
    /// empty or unavailable; that almost always means rate limiting and
    /// would otherwise record zero stars. Stats and languages are fetched
    /// side by side and each replaces the stored part only on success.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Store`] if a write fails.
    pub async fn refresh(&self) -> Result<GithubOutcome, RefreshError> {
        let _guard = self.guard.lock().await;
        let username = self.username.as_str();

        let repos = match self.client.fetch_all_repos(username).await {
            Ok(repos) if !repos.is_empty() => repos,
            Ok(_) => {
                tracing::warn!(username, "repository list empty; skipping github refresh");
                return Ok(GithubOutcome::skipped());
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "repository fetch failed; skipping github refresh");
                return Ok(GithubOutcome::skipped());
            }
        };

        let (stats, languages) = tokio::join!(
            self.client.fetch_user_stats(username, &repos),
            self.client.fetch_top_languages(&repos, self.top_langs),
        );

        let existing = match get_json::<GithubRecord>(self.store.as_ref(), GITHUB_STATS_KEY).await {
            Ok(existing) => existing,
            Err(e) => {
                tracing::warn!(error = %e, "stored github record unreadable; starting fresh");
                None
            }
        };
        let (existing_stats, existing_languages) =
            existing.map_or((None, None), |r| (r.stats, r.languages));

        let stats_updated = stats.is_ok();
        let languages_updated = languages.is_ok();
        let record = GithubRecord {
            stats: match stats {
                Ok(s) => Some(s),
                Err(e) => {
                    tracing::warn!(error = %e, "github stats fetch failed; keeping previous");
                    existing_stats
                }
            },
            languages: match languages {
                Ok(l) => Some(l),
                Err(e) => {
                    tracing::warn!(error = %e, "github languages fetch failed; keeping previous");
                    existing_languages
                }
            },
            updated_at: Utc::now(),
        };

        put_json(self.store.as_ref(), GITHUB_STATS_KEY, &record).await?;
        if let Some(stats) = &record.stats {
            self.store
                .put(GITHUB_STATS_SVG_KEY, Value::String(render_stats_card(stats)))
                .await?;
        }
        if let Some(languages) = &record.languages {
            self.store
                .put(
                    GITHUB_LANGUAGES_SVG_KEY,
                    Value::String(render_languages_card(languages)),
                )
                .await?;
        }

        tracing::info!(
            username,
            stats_updated,
            languages_updated,
            repos = repos.len(),
            "github stats refresh finished"
        );

        Ok(GithubOutcome {
            record: Some(record),
            stats_updated,
            languages_updated,
        })
    }
}
