//! Challenge-solver fetch strategy
//!
//! Middle strategy in the chain: pages that answer with an interactive
//! anti-bot challenge are routed through a FlareSolverr-compatible sidecar,
//! which drives a real browser and returns the solved page body.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::FetchConfig;
use crate::fetch::FetchStrategy;
use crate::models::PLATFORM_ORIGIN;
use crate::utils::error::FetchError;

/// Upper bound the sidecar is given to solve a challenge, in milliseconds
const SOLVER_MAX_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Serialize)]
struct SolverRequest<'a> {
    cmd: &'a str,
    url: &'a str,
    #[serde(rename = "maxTimeout")]
    max_timeout: u64,
}

#[derive(Debug, Deserialize)]
struct SolverResponse {
    status: String,
    #[serde(default)]
    message: String,
    solution: Option<SolverSolution>,
}

#[derive(Debug, Deserialize)]
struct SolverSolution {
    status: u16,
    #[serde(default)]
    response: String,
}

/// Client for a FlareSolverr-compatible challenge-solving service
pub struct SolverClient {
    client: Client,
    endpoint: String,
    base: String,
}

impl SolverClient {
    /// Create a client from fetch configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Unavailable` when no solver endpoint is
    /// configured, or `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let endpoint = config
            .solver_url
            .clone()
            .ok_or_else(|| FetchError::Unavailable("solver endpoint not configured".to_string()))?;

        let base = config
            .base_url
            .clone()
            .unwrap_or_else(|| PLATFORM_ORIGIN.to_string());

        // The sidecar may hold the request for the full challenge window, so
        // this client's own timeout must sit above SOLVER_MAX_TIMEOUT_MS
        let client = Client::builder()
            .timeout(Duration::from_millis(SOLVER_MAX_TIMEOUT_MS + 10_000))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            base,
        })
    }

    fn command_url(&self) -> String {
        format!("{}/v1", self.endpoint.trim_end_matches('/'))
    }

    fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

#[async_trait]
impl FetchStrategy for SolverClient {
    fn name(&self) -> &'static str {
        "solver"
    }

    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let page_url = self.full_url(path);
        let request = SolverRequest {
            cmd: "request.get",
            url: &page_url,
            max_timeout: SOLVER_MAX_TIMEOUT_MS,
        };

        let response = self
            .client
            .post(self.command_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
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

        let body: SolverResponse = response.json().await?;

        if body.status != "ok" {
            return Err(FetchError::SolverFailed(body.message));
        }

        let solution = body
            .solution
            .ok_or_else(|| FetchError::SolverFailed("solver returned no solution".to_string()))?;

        if !(200..300).contains(&solution.status) {
            return Err(FetchError::ServerError(solution.status));
        }

        Ok(solution.response)
    }
}
