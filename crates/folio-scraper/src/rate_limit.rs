//! Retry utilities shared by every outbound client.
//!
//! Transient failures (429, network errors, 5xx) are retried with jittered
//! exponential backoff. Everything else is propagated on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound on a single backoff sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`ScraperError::RateLimited`]: HTTP 429.
/// - [`ScraperError::Http`]: network-level failure (connection reset, timeout).
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
///
/// A 404, a 4xx other than 429, an unparseable body, or a missing App Store
/// record will not change on retry.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        _ => false,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries` times.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds,
/// capped at 60 s and scaled by a random factor in `[0.75, 1.25)`. With
/// `backoff_base_secs = 0` retries happen immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;

                let computed = backoff_base_secs
                    .saturating_mul(1000)
                    .saturating_mul(1u64 << (attempt - 1).min(16));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient fetch error, retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
