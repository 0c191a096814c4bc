//! Refresh cycles that scrape external sources and persist merged results.

pub mod apps;
pub mod error;
pub mod github;
pub mod social;
pub mod svg;

pub use apps::{AppsRefresher, APP_CACHE_TTL_MS};
pub use error::RefreshError;
pub use github::{GithubOutcome, GithubRefresher};
pub use social::{RefreshOutcome, SocialRefresher};
