//! Browser-impersonation fetch strategy
//!
//! First strategy in the chain: a client whose request shape matches a real
//! Chrome 120 navigation (client hints, sec-fetch headers, cookies, limited
//! redirects). Listing pages behind passive fingerprint checks usually
//! respond to this profile without a challenge.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::fetch::headers::impersonation_headers;
use crate::fetch::FetchStrategy;
use crate::models::PLATFORM_ORIGIN;
use crate::utils::error::FetchError;

/// Fetcher that presents a consistent Chrome fingerprint
///
/// Makes a single attempt per page; persistent failures are handed to the
/// next strategy in the chain rather than retried here.
pub struct ImpersonateClient {
    client: Client,
    base: String,
}

impl ImpersonateClient {
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

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(impersonation_headers())
            .cookie_store(true)
            .gzip(true)
            .redirect(Policy::limited(5))
            .build()?;

        Ok(Self { client, base })
    }

    fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

#[async_trait]
impl FetchStrategy for ImpersonateClient {
    fn name(&self) -> &'static str {
        "impersonate"
    }

    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full_url = self.full_url(path);

        let response = self.client.get(&full_url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
