//! App Store lookup caching.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use folio_core::{
    app_cache_key, AppCacheEntry, AppFetchError, AppFetchSuccess, AppsFetchSummary,
    APPS_SUMMARY_KEY,
};
use folio_db::{get_json, put_json, KvStore};
use folio_scraper::AppStoreClient;
use tokio::sync::Mutex;

use crate::error::RefreshError;

/// Cached lookups younger than this are served without a live fetch.
pub const APP_CACHE_TTL_MS: i64 = 12 * 60 * 60 * 1000;

pub struct AppsRefresher {
    client: AppStoreClient,
    store: Arc<dyn KvStore>,
    app_ids: Vec<String>,
    guard: Mutex<()>,
}

impl AppsRefresher {
    pub fn new(client: AppStoreClient, store: Arc<dyn KvStore>, app_ids: Vec<String>) -> Self {
        Self {
            client,
            store,
            app_ids,
            guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn app_ids(&self) -> &[String] {
        &self.app_ids
    }

    /// Fetch every configured app in turn and cache each lookup.
    ///
    /// Per-app failures are collected into the summary rather than aborting
    /// the run.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Store`] if the summary cannot be written.
    pub async fn refresh(&self) -> Result<AppsFetchSummary, RefreshError> {
        let _guard = self.guard.lock().await;
        let mut summary = AppsFetchSummary {
            success: Vec::new(),
            errors: Vec::new(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        for app_id in &self.app_ids {
            match self.fetch_and_cache(app_id).await {
                Ok((entry, screenshots)) => {
                    tracing::info!(app_id = %app_id, app_name = ?entry.app_name, "app lookup cached");
                    summary.success.push(AppFetchSuccess {
                        app_id: app_id.clone(),
                        app_name: entry.app_name.unwrap_or_default(),
                        screenshots,
                    });
                }
                Err(e) => {
                    tracing::error!(app_id = %app_id, error = %e, "app lookup failed");
                    summary.errors.push(AppFetchError {
                        app_id: app_id.clone(),
                        error: e.detail(),
                    });
                }
            }
        }

        put_json(self.store.as_ref(), APPS_SUMMARY_KEY, &summary).await?;
        tracing::info!(
            success = summary.success.len(),
            errors = summary.errors.len(),
            "apps refresh finished"
        );
        Ok(summary)
    }

    /// Look up one app live and cache the result.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Fetch`] if the lookup fails or
    /// [`RefreshError::Store`] if the cache write fails.
    pub async fn fetch_live(&self, app_id: &str) -> Result<AppCacheEntry, RefreshError> {
        self.fetch_and_cache(app_id).await.map(|(entry, _)| entry)
    }

    /// The cached lookup for `app_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Store`] on backend or decode failure.
    pub async fn cached(&self, app_id: &str) -> Result<Option<AppCacheEntry>, RefreshError> {
        Ok(get_json(self.store.as_ref(), &app_cache_key(app_id)).await?)
    }

    async fn fetch_and_cache(&self, app_id: &str) -> Result<(AppCacheEntry, usize), RefreshError> {
        let lookup = self.client.lookup(app_id).await?;
        let entry = AppCacheEntry {
            data: lookup.raw,
            fetched_at: Utc::now().timestamp_millis(),
            app_name: lookup.app_name,
        };
        put_json(self.store.as_ref(), &app_cache_key(app_id), &entry).await?;
        Ok((entry, lookup.screenshots))
    }
}
