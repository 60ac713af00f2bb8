//! Configuration management for the marquee scraper
//!
//! This module handles loading and validating configuration from environment
//! variables, files, and command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::retry::RetryConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fetch strategy configuration
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Extraction configuration
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Persistence configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Fetch-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Total attempts for the plain client before giving up
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff between attempts
    pub base_delay_ms: u64,

    /// Rate limit (requests per second)
    pub rate_limit: f64,

    /// Enable the browser-impersonation strategy
    pub use_impersonation: bool,

    /// Challenge-solver service endpoint (strategy is skipped when unset)
    pub solver_url: Option<String>,

    /// Override for the platform origin, mainly for tests
    pub base_url: Option<String>,
}

/// Extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Maximum records taken from structural anchor extraction
    pub max_structural_events: usize,

    /// Maximum records taken from rendered card extraction
    pub max_card_events: usize,

    /// Politeness delay in milliseconds between extracted records
    pub item_delay_ms: u64,
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage backend ("csv" or "sheet")
    pub backend: String,

    /// Directory for CSV output files
    pub output_dir: PathBuf,

    /// Remote spreadsheet service endpoint (required for the sheet backend)
    pub sheet_url: Option<String>,

    /// Worksheet name within the remote spreadsheet
    pub sheet_name: String,

    /// Bearer token for the remote spreadsheet service (optional)
    pub sheet_token: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let request_timeout_secs = std::env::var("MARQUEE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let max_retries = std::env::var("MARQUEE_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let base_delay_ms = std::env::var("MARQUEE_BASE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1000);

        let rate_limit = std::env::var("MARQUEE_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(2.0);

        let use_impersonation = std::env::var("MARQUEE_IMPERSONATE")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(true);

        let solver_url = std::env::var("MARQUEE_SOLVER_URL")
            .or_else(|_| std::env::var("FLARESOLVERR_URL"))
            .ok();

        let base_url = std::env::var("MARQUEE_BASE_URL").ok();

        let max_structural_events = std::env::var("MARQUEE_MAX_STRUCTURAL_EVENTS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(30);

        let max_card_events = std::env::var("MARQUEE_MAX_CARD_EVENTS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(50);

        let item_delay_ms = std::env::var("MARQUEE_ITEM_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(300);

        let backend =
            std::env::var("MARQUEE_STORE_BACKEND").unwrap_or_else(|_| String::from("csv"));

        let output_dir = std::env::var("MARQUEE_OUTPUT_DIR")
            .unwrap_or_else(|_| String::from("output"))
            .into();

        let sheet_url = std::env::var("MARQUEE_SHEET_URL").ok();

        let sheet_name =
            std::env::var("MARQUEE_SHEET_NAME").unwrap_or_else(|_| String::from("events"));

        let sheet_token = std::env::var("MARQUEE_SHEET_TOKEN").ok();

        let log_level = std::env::var("MARQUEE_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("MARQUEE_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            fetch: FetchConfig {
                request_timeout_secs,
                max_retries,
                base_delay_ms,
                rate_limit,
                use_impersonation,
                solver_url,
                base_url,
            },
            extract: ExtractConfig {
                max_structural_events,
                max_card_events,
                item_delay_ms,
            },
            store: StoreConfig {
                backend,
                output_dir,
                sheet_url,
                sheet_name,
                sheet_token,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from a file when a path is given, otherwise from the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.fetch.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.fetch.max_retries == 0 {
            anyhow::bail!("max_retries must be greater than 0");
        }

        if self.fetch.rate_limit <= 0.0 {
            anyhow::bail!("rate_limit must be positive");
        }

        if self.extract.max_structural_events == 0 || self.extract.max_card_events == 0 {
            anyhow::bail!("extraction caps must be greater than 0");
        }

        match self.store.backend.as_str() {
            "csv" => {}
            "sheet" => {
                if self.store.sheet_url.is_none() {
                    anyhow::bail!("sheet backend requires sheet_url");
                }
            }
            other => anyhow::bail!("unknown store backend: {other}"),
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.request_timeout_secs)
    }

    /// Get the politeness delay between extracted records as Duration
    #[must_use]
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.extract.item_delay_ms)
    }
}

impl FetchConfig {
    /// Build the retry schedule used by the plain client
    #[must_use]
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            base_delay_ms: self.base_delay_ms,
            ..Default::default()
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_retries: 3,
            base_delay_ms: 1000,
            rate_limit: 2.0,
            use_impersonation: true,
            solver_url: None,
            base_url: None,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_structural_events: 30,
            max_card_events: 50,
            item_delay_ms: 300,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: String::from("csv"),
            output_dir: PathBuf::from("output"),
            sheet_url: None,
            sheet_name: String::from("events"),
            sheet_token: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let mut config = Config::default();
        config.fetch.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_backend_is_invalid() {
        let mut config = Config::default();
        config.store.backend = String::from("excel");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sheet_backend_requires_url() {
        let mut config = Config::default();
        config.store.backend = String::from("sheet");
        assert!(config.validate().is_err());

        config.store.sheet_url = Some(String::from("http://localhost:8080"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_request_timeout_conversion() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.item_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_retry_config_mapping() {
        let mut config = Config::default();
        config.fetch.max_retries = 5;
        config.fetch.base_delay_ms = 250;

        let retry = config.fetch.retry_config();
        assert_eq!(retry.max_retries, 5);
        assert_eq!(retry.base_delay_ms, 250);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var("MARQUEE_RATE_LIMIT");
        std::env::remove_var("MARQUEE_STORE_BACKEND");

        let config = Config::from_env().unwrap();
        assert_eq!(config.fetch.rate_limit, 2.0);
        assert_eq!(config.store.backend, "csv");
        assert!(config.fetch.solver_url.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        std::env::set_var("MARQUEE_RATE_LIMIT", "5.5");
        std::env::set_var("MARQUEE_SOLVER_URL", "http://localhost:8191");
        std::env::set_var("MARQUEE_IMPERSONATE", "false");

        let config = Config::from_env().unwrap();
        assert_eq!(config.fetch.rate_limit, 5.5);
        assert_eq!(
            config.fetch.solver_url.as_deref(),
            Some("http://localhost:8191")
        );
        assert!(!config.fetch.use_impersonation);

        std::env::remove_var("MARQUEE_RATE_LIMIT");
        std::env::remove_var("MARQUEE_SOLVER_URL");
        std::env::remove_var("MARQUEE_IMPERSONATE");
    }

    #[test]
    fn test_from_toml_file() {
        let toml_src = r#"
            [fetch]
            request_timeout_secs = 10
            max_retries = 2
            base_delay_ms = 500
            rate_limit = 1.0
            use_impersonation = false

            [extract]
            max_structural_events = 5
            max_card_events = 10
            item_delay_ms = 0

            [store]
            backend = "csv"
            output_dir = "out"
            sheet_name = "events"

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(config.fetch.request_timeout_secs, 10);
        assert_eq!(config.extract.max_card_events, 10);
        assert_eq!(config.store.output_dir, PathBuf::from("out"));
        assert!(config.validate().is_ok());
    }
}
