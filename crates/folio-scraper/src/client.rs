//! Shared HTTP client for every outbound fetch.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Fallback when a `Retry-After` header is absent or not an integer.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// `reqwest` client with a fixed `User-Agent`, timeouts, and a retry policy.
///
/// Non-2xx responses become typed errors: 429 as
/// [`ScraperError::RateLimited`], 404 as [`ScraperError::NotFound`], anything
/// else as [`ScraperError::UnexpectedStatus`]. Transient errors are retried
/// with exponential backoff up to `max_retries` additional attempts.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff.
    backoff_base_secs: u64,
}

impl HttpClient {
    /// Creates a client with the given timeout, `User-Agent`, and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for retriable errors. Set to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the `FOLIO_SCRAPER_*` settings.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the client cannot be constructed.
    pub fn from_app_config(config: &folio_core::AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_secs,
        )
    }

    /// GET `url` and return the body as text, retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx (5xx retried).
    /// - [`ScraperError::Http`]: network or TLS failure after all retries.
    pub async fn get_text(&self, url: &str, headers: &HeaderMap) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .get(url)
                .headers(headers.clone())
                .send()
                .await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                return Err(ScraperError::RateLimited {
                    domain: domain_of(url),
                    retry_after_secs,
                });
            }

            if status == StatusCode::NOT_FOUND {
                return Err(ScraperError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }

    /// GET `url` and return the body of whatever response comes back.
    ///
    /// The status is not checked: a 403 or 5xx page is returned like a 200
    /// one. Only transport failures are errors, and only those are retried.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Http`]: network or TLS failure after all retries.
    pub async fn get_page(&self, url: &str, headers: &HeaderMap) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .get(url)
                .headers(headers.clone())
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                tracing::debug!(status = status.as_u16(), url, "non-success page response");
            }
            Ok(response.text().await?)
        })
        .await
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Everything [`HttpClient::get_text`] returns, plus
    /// [`ScraperError::Deserialize`] when the body does not decode as `T`
    /// (not retried).
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &HeaderMap,
        context: &str,
    ) -> Result<T, ScraperError> {
        let body = self.get_text(url, headers).await?;
        serde_json::from_str(&body).map_err(|source| ScraperError::Deserialize {
            context: context.to_owned(),
            source,
        })
    }
}

/// Host portion of `url`, or the whole string if it does not parse.
pub(crate) fn domain_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
