//! HTTP client with a fixed browser-like identity and bounded retry.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::warn;

use crate::config::{FETCH_ATTEMPTS, FETCH_RETRY_DELAY, USER_AGENT};

/// A failed page fetch. Both variants are retryable; after the retry
/// budget is spent the last error becomes terminal for that URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: StatusCode },
}

/// Thin wrapper over [`reqwest::Client`] carrying the fixed identity
/// header used for every request.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_attempts: u32,
    retry_delay: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            max_attempts: FETCH_ATTEMPTS,
            retry_delay: FETCH_RETRY_DELAY,
        }
    }

    /// Override the delay between retry attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// GET a page as text. Non-2xx statuses are errors so the retry
    /// policy treats them the same as transport failures.
    pub async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, FetchError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text().await?)
    }

    /// GET with the retry policy applied.
    pub async fn get_text_with_retry(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, FetchError> {
        with_retry(self.max_attempts, self.retry_delay, || {
            self.get_text(url, query)
        })
        .await
    }
}

/// Run `op` up to `max_attempts` times with a fixed `delay` between
/// attempts, returning the last error once attempts are exhausted.
///
/// Listing and detail fetches share this policy; neither gets
/// exponential backoff.
pub async fn with_retry<T, E, F, Fut>(max_attempts: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                warn!("attempt {attempt}/{max_attempts} failed: {err}, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retry_returns_first_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = with_retry(3, Duration::ZERO, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_recovers_within_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = with_retry(3, Duration::ZERO, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(format!("attempt {n} down"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_surfaces_last_error_after_exhaustion() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = with_retry(3, Duration::ZERO, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(format!("attempt {n} down")) }
        })
        .await;
        assert_eq!(result.unwrap_err(), "attempt 3 down");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
