//! Plain HTTP client with rate limiting and retry
//!
//! The last strategy in the fetch chain: a direct reqwest client with fixed
//! browser-like headers, rate limiting via governor, and automatic retry
//! with exponential backoff on transient status codes.

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::Client;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::debug;

use crate::config::FetchConfig;
use crate::fetch::headers::{browser_headers, DEFAULT_USER_AGENT, SEARCH_REFERER};
use crate::fetch::FetchStrategy;
use crate::models::PLATFORM_ORIGIN;
use crate::utils::error::FetchError;
use crate::utils::retry::RetryConfig;

/// Direct fetcher used when the fancier strategies are unavailable or blocked
///
/// Requests carry a fixed desktop Chrome profile; transient server errors are
/// retried with exponential backoff before the strategy reports failure.
pub struct PlainClient {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Retry schedule for transient failures
    retry: RetryConfig,

    /// Origin all request paths are joined onto
    base: String,
}

impl PlainClient {
    /// Create a client from fetch configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let base = config
            .base_url
            .clone()
            .unwrap_or_else(|| PLATFORM_ORIGIN.to_string());

        Self::with_config(
            config.rate_limit as u32,
            config.retry_config(),
            Duration::from_secs(config.request_timeout_secs),
            &base,
        )
    }

    /// Create a client with explicit settings
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(
        requests_per_second: u32,
        retry: RetryConfig,
        timeout: Duration,
        base: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .cookie_store(true)
            .build()?;

        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::new(1).unwrap());
        let quota = Quota::per_second(rate);
        let rate_limiter = RateLimiter::direct(quota);

        Ok(Self {
            client,
            rate_limiter,
            retry,
            base: base.to_string(),
        })
    }

    /// Fetch with exponential backoff retry logic
    ///
    /// # Errors
    ///
    /// Returns `FetchError::MaxRetriesExceeded` once all attempts fail, or
    /// `FetchError::ServerError` immediately for non-retryable statuses
    async fn fetch_with_retry(&self, path: &str) -> Result<String, FetchError> {
        let full_url = self.full_url(path);
        let mut last_error = None;

        for attempt in 0..self.retry.max_retries {
            // Apply exponential backoff for retries
            if attempt > 0 {
                tokio::time::sleep(self.retry.calculate_delay(attempt)).await;
            }

            let headers = browser_headers(DEFAULT_USER_AGENT, SEARCH_REFERER);

            match self.client.get(&full_url).headers(headers).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response.text().await?);
                    } else if Self::should_retry(status.as_u16()) {
                        // Retryable error, continue loop
                        last_error = Some(FetchError::ServerError(status.as_u16()));
                        continue;
                    } else {
                        // Non-retryable error, return immediately
                        return Err(FetchError::ServerError(status.as_u16()));
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(FetchError::Timeout);
                    } else {
                        last_error = Some(FetchError::Http(e));
                    }
                }
            }
        }

        // All attempts exhausted
        if let Some(e) = last_error {
            debug!(url = %full_url, error = %e, "Plain client exhausted its attempts");
        }
        Err(FetchError::MaxRetriesExceeded)
    }

    /// Determine if a status code should trigger a retry
    ///
    /// Retry on:
    /// - 429 (Too Many Requests)
    /// - 500 (Internal Server Error)
    /// - 502 (Bad Gateway)
    /// - 503 (Service Unavailable)
    /// - 504 (Gateway Timeout)
    fn should_retry(status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }

    /// Join a request path onto the configured origin
    fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

#[async_trait]
impl FetchStrategy for PlainClient {
    fn name(&self) -> &'static str {
        "plain"
    }

    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        // Wait for rate limiter before the attempt loop
        self.rate_limiter.until_ready().await;

        self.fetch_with_retry(path).await
    }
}
