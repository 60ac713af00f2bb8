//! marquee - Event Listing Scraper
//!
//! A resilient scraper for city event listings: tiered anti-bot fetching,
//! heuristic record extraction, stable identity derivation, and idempotent
//! snapshot reconciliation.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`fetch`] - Tiered fetch strategies with rate limiting and retry
//! - [`extract`] - Structural and card-heuristic record extraction
//! - [`identity`] - Stable record ids and time-based status classification
//! - [`models`] - Core data structures and types
//! - [`store`] - Snapshot persistence (CSV files, remote spreadsheet)
//! - [`pipeline`] - Per-city runs and the all-cities batch loop
//! - [`utils`] - Errors, retry combinators and small helpers
//!
//! # Example
//!
//! ```no_run
//! use marquee::config::Config;
//! use marquee::models::City;
//! use marquee::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let pipeline = Pipeline::new(config);
//!     let report = pipeline.run_for_city(City::Mumbai).await?;
//!     println!("extracted {}", report.extracted);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod extract;
pub mod fetch;
pub mod identity;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::extract::{CardExtractor, EventExtractor, StructuralExtractor};
    pub use crate::fetch::{FetchChain, FetchStrategy, RenderProvider};
    pub use crate::models::{City, EventRecord, EventStatus};
    pub use crate::pipeline::{Pipeline, RunReport};
    pub use crate::store::{CsvStore, DatasetStore, SheetStore};
    pub use crate::utils::error::{FetchError, PipelineError, StoreError};
}

// Direct re-exports for convenience
pub use models::{City, EventRecord, EventStatus};
