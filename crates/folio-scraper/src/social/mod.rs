//! Public profile scrapers, one adapter per social platform.
//!
//! An adapter is data: a profile URL template plus an [`ExtractionStrategy`].
//! Changing how a platform is scraped means swapping its adapter, never
//! touching the orchestration in [`SocialClient::fetch_all`].

mod fetch_all;

use std::collections::BTreeMap;

use folio_core::{is_valid_handle, Platform, PlatformStat};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};

use crate::client::HttpClient;
use crate::extract::ExtractionStrategy;

const HANDLE_PLACEHOLDER: &str = "{handle}";

/// How to fetch and read one platform's public profile page.
#[derive(Debug, Clone)]
pub struct SocialAdapter {
    platform: Platform,
    base_url: String,
    /// Path with a `{handle}` placeholder, e.g. `/@{handle}/about`.
    path_template: String,
    strategy: ExtractionStrategy,
}

impl SocialAdapter {
    pub fn new(
        platform: Platform,
        base_url: impl Into<String>,
        path_template: impl Into<String>,
        strategy: ExtractionStrategy,
    ) -> Self {
        Self {
            platform,
            base_url: base_url.into(),
            path_template: path_template.into(),
            strategy,
        }
    }

    /// The built-in adapter for `platform`.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        let (base_url, path_template, patterns): (&str, &str, &[&str]) = match platform {
            Platform::Youtube => (
                "https://www.youtube.com",
                "/@{handle}/about",
                &[
                    r#""subscriberCountText":\{"simpleText":"([^"]+)"\}"#,
                    r"(?i)(\d+(?:\.\d+)?[KM]?) subscribers",
                ],
            ),
            Platform::Instagram => (
                "https://www.instagram.com",
                "/{handle}/",
                &[
                    r#""edge_followed_by":\{"count":(\d+)\}"#,
                    r#""follower_count":(\d+)"#,
                ],
            ),
            Platform::Tiktok => (
                "https://www.tiktok.com",
                "/@{handle}",
                &[
                    r#""followerCount":(\d+)"#,
                    r#""stats":\{[^}]*"followerCount":(\d+)"#,
                ],
            ),
            Platform::Twitter => (
                "https://x.com",
                "/{handle}",
                &[
                    r#""followers_count":(\d+)"#,
                    r#""normal_followers_count":"(\d+)""#,
                ],
            ),
            Platform::Linkedin => (
                "https://www.linkedin.com",
                "/in/{handle}/",
                &[r#""followers":(\d+)"#],
            ),
        };

        Self::new(
            platform,
            base_url,
            path_template,
            ExtractionStrategy::builtin(patterns),
        )
    }

    /// Point the adapter at another origin (a mirror or a test server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub fn strategy(&self) -> &ExtractionStrategy {
        &self.strategy
    }

    #[must_use]
    pub fn profile_url(&self, handle: &str) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.path_template.replace(HANDLE_PLACEHOLDER, handle)
        )
    }
}

/// Scrapes follower counts from public profile pages.
#[derive(Debug, Clone)]
pub struct SocialClient {
    http: HttpClient,
    adapters: BTreeMap<Platform, SocialAdapter>,
}

impl SocialClient {
    /// A client with the built-in adapter for every platform.
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        let adapters = Platform::ALL
            .into_iter()
            .map(|p| (p, SocialAdapter::for_platform(p)))
            .collect();
        Self { http, adapters }
    }

    /// Replace the adapter for the adapter's platform.
    #[must_use]
    pub fn with_adapter(mut self, adapter: SocialAdapter) -> Self {
        self.adapters.insert(adapter.platform(), adapter);
        self
    }

    /// Point every adapter at `base_url`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.adapters = self
            .adapters
            .into_iter()
            .map(|(p, a)| (p, a.with_base_url(base_url)))
            .collect();
        self
    }

    #[must_use]
    pub fn adapter(&self, platform: Platform) -> Option<&SocialAdapter> {
        self.adapters.get(&platform)
    }

    /// Scrape one platform. Never fails: transport errors are captured in
    /// [`PlatformStat::error`]. The page body is searched whatever its
    /// status, and a page without a recognizable count yields `0` with no
    /// error.
    pub async fn fetch(&self, platform: Platform, handle: &str) -> PlatformStat {
        let Some(adapter) = self.adapter(platform) else {
            return PlatformStat::failed(format!("no adapter configured for {platform}"));
        };
        if !is_valid_handle(handle) {
            tracing::warn!(%platform, handle, "refusing to build profile url from invalid handle");
            return PlatformStat::failed(format!("invalid handle \"{handle}\""));
        }
        let url = adapter.profile_url(handle);

        match self.http.get_page(&url, &page_headers()).await {
            Ok(body) => match adapter.strategy().extract_count(&body) {
                Some(count) => {
                    tracing::debug!(%platform, handle, count, "profile count extracted");
                    PlatformStat::ok(count)
                }
                None => {
                    tracing::warn!(%platform, handle, %url, "no count pattern matched profile page");
                    PlatformStat::ok(0)
                }
            },
            Err(e) => {
                tracing::warn!(%platform, handle, error = %e, "profile fetch failed");
                PlatformStat::failed(e.to_string())
            }
        }
    }
}

fn page_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}
