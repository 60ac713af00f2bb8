//! Error types for the marquee scraper
//!
//! This module defines custom error types used throughout the application.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server error with status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts exceeded")]
    MaxRetriesExceeded,

    /// Challenge solver rejected the request or returned no content
    #[error("Challenge solver failed: {0}")]
    SolverFailed(String),

    /// Every configured fetch strategy failed for this URL
    #[error("All fetch strategies exhausted")]
    StrategiesExhausted,

    /// Strategy could not be constructed in this environment
    #[error("Fetch strategy unavailable: {0}")]
    Unavailable(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors that can occur while loading or saving a persisted dataset
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encode/decode error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Remote sink transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote sink rejected the request
    #[error("Sheet API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Persisted row could not be interpreted as an event record
    #[error("Malformed row: {0}")]
    MalformedRow(String),

    /// Sink selected but its required settings are missing
    #[error("Store not configured: {0}")]
    NotConfigured(String),
}

/// Errors surfaced by a per-city pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Fetch chain could not be assembled
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Dataset load or save failure, fatal to this city's run
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
