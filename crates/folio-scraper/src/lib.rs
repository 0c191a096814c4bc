pub mod appstore;
pub mod client;
pub mod error;
pub mod extract;
pub mod github;
pub mod parse;
mod rate_limit;
pub mod social;

pub use appstore::{AppLookup, AppStoreClient, ITUNES_LOOKUP_URL};
pub use client::HttpClient;
pub use error::ScraperError;
pub use extract::ExtractionStrategy;
pub use github::{language_color, GithubClient, GithubRepo, GITHUB_API_BASE};
pub use parse::parse_count;
pub use social::{SocialAdapter, SocialClient};
