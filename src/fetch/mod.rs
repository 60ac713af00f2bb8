//! Tiered page fetching
//!
//! Listing pages sit behind anti-bot protection of varying severity, so
//! fetching runs through an ordered chain of strategies: a client that
//! impersonates a real browser fingerprint, a challenge-solving sidecar, and
//! finally a plain retrying client with spoofed headers. The first strategy
//! that returns a page wins; a chain where every strategy fails reports
//! `FetchError::StrategiesExhausted`.

pub mod headers;
pub mod impersonate;
pub mod plain;
pub mod render;
pub mod solver;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::utils::error::FetchError;

pub use impersonate::ImpersonateClient;
pub use plain::PlainClient;
pub use render::{cards_from_html, RenderProvider, RenderedCard, SolverRender, CARD_SELECTORS};
pub use solver::SolverClient;

/// One way of obtaining a listing page body
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this strategy can currently serve requests
    fn is_available(&self) -> bool {
        true
    }

    /// Fetch the page at `path`, joined onto the configured origin
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// Ordered fallback chain over fetch strategies
pub struct FetchChain {
    strategies: Vec<Box<dyn FetchStrategy>>,
}

impl FetchChain {
    /// Create a chain from explicit strategies, tried in the given order
    pub fn new(strategies: Vec<Box<dyn FetchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Build the production chain from configuration
    ///
    /// Strategies that cannot be constructed are skipped with a warning so
    /// the remaining chain still serves requests.
    pub fn from_config(config: &FetchConfig) -> Self {
        let mut strategies: Vec<Box<dyn FetchStrategy>> = Vec::new();

        if config.use_impersonation {
            match ImpersonateClient::new(config) {
                Ok(client) => strategies.push(Box::new(client)),
                Err(e) => warn!(error = %e, "Impersonation strategy unavailable"),
            }
        }

        if config.solver_url.is_some() {
            match SolverClient::new(config) {
                Ok(client) => strategies.push(Box::new(client)),
                Err(e) => warn!(error = %e, "Solver strategy unavailable"),
            }
        }

        match PlainClient::new(config) {
            Ok(client) => strategies.push(Box::new(client)),
            Err(e) => warn!(error = %e, "Plain strategy unavailable"),
        }

        Self::new(strategies)
    }

    /// Number of strategies in the chain
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether the chain has no strategies at all
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Fetch `path` with the first strategy that succeeds
    ///
    /// # Errors
    ///
    /// Returns `FetchError::StrategiesExhausted` when every strategy fails
    pub async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        for strategy in &self.strategies {
            if !strategy.is_available() {
                debug!(strategy = strategy.name(), "Skipping unavailable strategy");
                continue;
            }

            debug!(strategy = strategy.name(), path = %path, "Trying fetch strategy");

            match strategy.fetch(path).await {
                Ok(body) => {
                    debug!(
                        strategy = strategy.name(),
                        bytes = body.len(),
                        "Fetch succeeded"
                    );
                    return Ok(body);
                }
                Err(e) => {
                    warn!(
                        strategy = strategy.name(),
                        error = %e,
                        "Fetch strategy failed, falling back"
                    );
                }
            }
        }

        Err(FetchError::StrategiesExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticBody(&'static str);

    #[async_trait]
    impl FetchStrategy for StaticBody {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch(&self, _path: &str) -> Result<String, FetchError> {
            Ok(self.0.to_string())
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl FetchStrategy for AlwaysFails {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self, _path: &str) -> Result<String, FetchError> {
            Err(FetchError::ServerError(403))
        }
    }

    struct NeverAvailable;

    #[async_trait]
    impl FetchStrategy for NeverAvailable {
        fn name(&self) -> &'static str {
            "offline"
        }

        fn is_available(&self) -> bool {
            false
        }

        async fn fetch(&self, _path: &str) -> Result<String, FetchError> {
            Ok("must never be returned".to_string())
        }
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let chain = FetchChain::new(vec![
            Box::new(AlwaysFails),
            Box::new(StaticBody("winner")),
            Box::new(StaticBody("never reached")),
        ]);

        let body = chain.fetch("/explore/events-mumbai").await.unwrap();
        assert_eq!(body, "winner");
    }

    #[tokio::test]
    async fn test_unavailable_strategies_are_skipped() {
        let chain = FetchChain::new(vec![
            Box::new(NeverAvailable),
            Box::new(StaticBody("served")),
        ]);

        let body = chain.fetch("/x").await.unwrap();
        assert_eq!(body, "served");
    }

    #[tokio::test]
    async fn test_exhausted_chain_reports_error() {
        let chain = FetchChain::new(vec![Box::new(AlwaysFails), Box::new(AlwaysFails)]);

        let err = chain.fetch("/x").await.unwrap_err();
        assert!(matches!(err, FetchError::StrategiesExhausted));
    }

    #[tokio::test]
    async fn test_empty_chain_reports_error() {
        let chain = FetchChain::new(Vec::new());

        let err = chain.fetch("/x").await.unwrap_err();
        assert!(matches!(err, FetchError::StrategiesExhausted));
    }

    #[test]
    fn test_from_config_default_has_impersonate_and_plain() {
        let config = FetchConfig {
            request_timeout_secs: 10,
            max_retries: 3,
            base_delay_ms: 100,
            rate_limit: 2.0,
            use_impersonation: true,
            solver_url: None,
            base_url: None,
        };

        let chain = FetchChain::from_config(&config);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_from_config_with_solver_has_three_tiers() {
        let config = FetchConfig {
            request_timeout_secs: 10,
            max_retries: 3,
            base_delay_ms: 100,
            rate_limit: 2.0,
            use_impersonation: true,
            solver_url: Some("http://localhost:8191".to_string()),
            base_url: None,
        };

        let chain = FetchChain::from_config(&config);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_from_config_plain_only() {
        let config = FetchConfig {
            request_timeout_secs: 10,
            max_retries: 3,
            base_delay_ms: 100,
            rate_limit: 2.0,
            use_impersonation: false,
            solver_url: None,
            base_url: None,
        };

        let chain = FetchChain::from_config(&config);
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_empty());
    }
}
