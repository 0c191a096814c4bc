pub mod app_config;
pub mod apps;
pub mod config;
pub mod github;
pub mod merge;
pub mod stats;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use apps::{
    app_cache_key, AppCacheEntry, AppFetchError, AppFetchSuccess, AppsFetchSummary,
    APPS_SUMMARY_KEY,
};
pub use config::{
    build_app_config, is_numeric_id, is_valid_handle, load_app_config, load_app_config_from_env,
};
pub use github::{
    GithubRecord, GithubUserStats, LanguageShare, GITHUB_LANGUAGES_SVG_KEY, GITHUB_STATS_KEY,
    GITHUB_STATS_SVG_KEY,
};
pub use merge::{merge_snapshot, merge_stat, MergeResult};
pub use stats::{CandidateSnapshot, Platform, PlatformStat, StatsSnapshot};

/// Key/value key holding the latest merged social [`StatsSnapshot`].
pub const SOCIAL_SNAPSHOT_KEY: &str = "latestCounts";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
