//! iTunes lookup client for App Store metadata.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use serde_json::Value;

use crate::client::HttpClient;
use crate::error::ScraperError;

pub const ITUNES_LOOKUP_URL: &str = "https://itunes.apple.com/lookup";

/// One successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppLookup {
    /// The full lookup response, cached and served verbatim.
    pub raw: Value,
    pub app_name: Option<String>,
    pub screenshots: usize,
}

pub struct AppStoreClient {
    http: HttpClient,
    lookup_url: String,
}

impl AppStoreClient {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            lookup_url: ITUNES_LOOKUP_URL.to_owned(),
        }
    }

    #[must_use]
    pub fn with_lookup_url(mut self, lookup_url: impl Into<String>) -> Self {
        self.lookup_url = lookup_url.into();
        self
    }

    /// Look up a single app by its numeric store ID.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::AppNotFound`] when the response has no
    /// results, or any transport, status, or decode error from the request.
    pub async fn lookup(&self, app_id: &str) -> Result<AppLookup, ScraperError> {
        let mut url =
            reqwest::Url::parse(&self.lookup_url).map_err(|e| ScraperError::InvalidUrl {
                url: self.lookup_url.clone(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut().append_pair("id", app_id);

        let raw: Value = self
            .http
            .get_json(url.as_str(), &lookup_headers(), &format!("iTunes lookup for {app_id}"))
            .await?;

        let Some(app) = raw.get("results").and_then(|r| r.get(0)) else {
            return Err(ScraperError::AppNotFound {
                app_id: app_id.to_owned(),
            });
        };

        let app_name = app
            .get("trackName")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let screenshots = app
            .get("screenshotUrls")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        Ok(AppLookup {
            raw,
            app_name,
            screenshots,
        })
    }
}

fn lookup_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}
