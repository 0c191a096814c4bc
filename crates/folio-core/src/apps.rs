//! Cached App Store lookup payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key holding the summary of the last apps refresh.
pub const APPS_SUMMARY_KEY: &str = "fetch-summary";

/// Key under which the lookup payload for `app_id` is cached.
#[must_use]
pub fn app_cache_key(app_id: &str) -> String {
    format!("app:{app_id}")
}

/// One cached iTunes lookup response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCacheEntry {
    /// Raw lookup response, served verbatim.
    pub data: Value,
    /// Unix epoch milliseconds.
    pub fetched_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
}

impl AppCacheEntry {
    /// Whether the entry is younger than `ttl_ms` at `now_ms`.
    #[must_use]
    pub fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        self.fetched_at > now_ms - ttl_ms
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppFetchSuccess {
    pub app_id: String,
    pub app_name: String,
    pub screenshots: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppFetchError {
    pub app_id: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppsFetchSummary {
    pub success: Vec<AppFetchSuccess>,
    pub errors: Vec<AppFetchError>,
    pub timestamp: String,
}
