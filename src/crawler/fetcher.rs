//! Page fetcher with transient-failure retry
//!
//! This module handles page requests for the crawler, including:
//! - Classifying HTTP statuses as success, transient or permanent
//! - Retrying transient statuses with linear backoff
//! - Mapping transport failures to typed fetch errors

use crate::config::CrawlConfig;
use crate::crawler::transport::{Transport, TransportError};
use crate::FetchError;
use std::sync::Arc;
use std::time::Duration;

/// HTTP statuses worth retrying: request timeout, bad gateway,
/// service unavailable and gateway timeout
pub const TRANSIENT_STATUSES: [u16; 4] = [408, 502, 503, 504];

/// Returns true if the status is retried by the fetcher
pub fn is_transient(status: u16) -> bool {
    TRANSIENT_STATUSES.contains(&status)
}

/// How many times, and how patiently, transient failures are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Retry `k` (1-indexed) waits `k` units
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    /// Creates a policy
    pub fn new(max_retries: u32, backoff_unit: Duration) -> Self {
        Self {
            max_retries,
            backoff_unit,
        }
    }

    /// Builds the policy described by a crawl configuration
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(config.max_retry_attempts, config.retry_backoff_duration())
    }

    /// Wait before retry `retry` (1-indexed)
    pub fn backoff(&self, retry: u32) -> Duration {
        self.backoff_unit.saturating_mul(retry)
    }
}

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The URL that was requested
    pub url: String,
    /// HTTP status code (2xx)
    pub status: u16,
    /// Raw markup
    pub body: String,
}

/// Fetches pages, retrying transient HTTP statuses
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Return the page |
/// | HTTP 408, 502, 503, 504 | Retry up to `max_retries` times, linear backoff |
/// | Any other status | Fail immediately |
/// | Timeout | Fail immediately |
/// | Connection error | Fail immediately |
#[derive(Debug)]
pub struct RetryingFetcher<T> {
    transport: Arc<T>,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingFetcher<T> {
    /// Creates a fetcher over a shared transport
    pub fn new(transport: Arc<T>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Returns the retry policy
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches a URL, making at most `max_retries + 1` attempts
    ///
    /// # Returns
    ///
    /// * `Ok(Page)` - A 2xx response
    /// * `Err(FetchError)` - A permanent failure, or retries exhausted
    pub async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            let response = self
                .transport
                .get(url)
                .await
                .map_err(|e| transport_failure(url, e))?;

            if response.is_success() {
                return Ok(Page {
                    url: url.to_string(),
                    status: response.status,
                    body: response.body,
                });
            }

            if !is_transient(response.status) {
                return Err(FetchError::Http {
                    url: url.to_string(),
                    status: response.status,
                });
            }

            if attempt >= self.policy.max_retries {
                tracing::error!(
                    url,
                    status = response.status,
                    attempts = attempt + 1,
                    "Max retries reached"
                );
                return Err(FetchError::RetriesExhausted {
                    url: url.to_string(),
                    status: response.status,
                    attempts: attempt + 1,
                });
            }

            attempt += 1;
            let wait = self.policy.backoff(attempt);
            tracing::warn!(
                url,
                status = response.status,
                retry = attempt,
                wait_secs = wait.as_secs_f64(),
                "Transient HTTP error occurred"
            );
            tokio::time::sleep(wait).await;
        }
    }
}

fn transport_failure(url: &str, error: TransportError) -> FetchError {
    let url = url.to_string();
    match error {
        TransportError::Timeout => FetchError::Timeout { url },
        TransportError::Connect(message) => FetchError::Connection { url, message },
        TransportError::Request(message) => FetchError::Request { url, message },
    }
}
