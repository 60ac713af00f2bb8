//! Per-city scrape pipeline
//!
//! One run per city: fetch the explore listing through the strategy chain,
//! extract records structurally, fall back to rendered cards from the city
//! landing page when the markup route finds nothing, then reconcile with the
//! previous snapshot and persist. Fetch failures degrade to an empty batch;
//! store failures abort the city run so the existing snapshot stays intact.

use chrono::Local;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::extract::{CardExtractor, EventExtractor, ExtractContext, ExtractSource, StructuralExtractor};
use crate::fetch::{FetchChain, RenderProvider, SolverRender};
use crate::models::{City, EventRecord, PLATFORM_ORIGIN};
use crate::store::{merge, CsvStore, DatasetStore, SheetStore};
use crate::utils::error::{PipelineError, StoreError};

/// Outcome of one city run
#[derive(Debug)]
pub struct RunReport {
    /// City this run covered
    pub city: City,

    /// Records extracted this run
    pub extracted: usize,

    /// Snapshot size after reconciliation, zero when nothing was persisted
    pub persisted: usize,

    /// Primary fetch failure, if any; the run itself still completes
    pub fetch_error: Option<String>,
}

/// Outcome of a batch over several cities
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Reports for cities that ran to completion
    pub reports: Vec<RunReport>,

    /// Cities whose run aborted, with the fatal error
    pub failed: Vec<(City, PipelineError)>,
}

impl BatchReport {
    #[must_use]
    pub fn total_extracted(&self) -> usize {
        self.reports.iter().map(|r| r.extracted).sum()
    }

    #[must_use]
    pub fn total_persisted(&self) -> usize {
        self.reports.iter().map(|r| r.persisted).sum()
    }
}

/// Scrape pipeline wiring fetch, extraction and persistence together
pub struct Pipeline {
    config: Config,
    chain: FetchChain,
    structural: StructuralExtractor,
    cards: CardExtractor,
    renderer: Option<Box<dyn RenderProvider>>,
}

impl Pipeline {
    /// Build a pipeline from configuration
    pub fn new(config: Config) -> Self {
        let chain = FetchChain::from_config(&config.fetch);
        let structural = StructuralExtractor::new(&config.extract);
        let cards = CardExtractor::new(&config.extract);

        let renderer: Option<Box<dyn RenderProvider>> = match SolverRender::new(&config) {
            Ok(render) => Some(Box::new(render)),
            Err(e) => {
                debug!(reason = %e, "Rendered-page fallback disabled");
                None
            }
        };

        Self {
            config,
            chain,
            structural,
            cards,
            renderer,
        }
    }

    /// Replace the rendering provider, mainly for tests
    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn RenderProvider>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    fn origin(&self) -> &str {
        self.config
            .fetch
            .base_url
            .as_deref()
            .unwrap_or(PLATFORM_ORIGIN)
    }

    fn store_for(&self, city: City, day: chrono::NaiveDate) -> Result<Box<dyn DatasetStore>, StoreError> {
        match self.config.store.backend.as_str() {
            "sheet" => Ok(Box::new(SheetStore::from_config(&self.config.store)?)),
            _ => Ok(Box::new(CsvStore::for_city(
                &self.config.store.output_dir,
                city,
                day,
            ))),
        }
    }

    /// Run the full scrape for one city
    ///
    /// Fetch and extraction failures produce an empty batch and a reported
    /// no-op; only persistence failures abort the run.
    pub async fn run_for_city(&self, city: City) -> Result<RunReport, PipelineError> {
        let now = Local::now().naive_local();
        info!(city = %city, "Starting scrape");

        let mut fetch_error = None;
        let mut records: Vec<EventRecord> = Vec::new();

        let explore_path = city.explore_path();
        match self.chain.fetch(&explore_path).await {
            Ok(html) => {
                let page_url = format!("{}{}", self.origin(), explore_path);
                let ctx = ExtractContext::new(city, now, page_url);
                records = self
                    .structural
                    .extract(ExtractSource::Markup(&html), &ctx)
                    .await;
            }
            Err(e) => {
                warn!(city = %city, error = %e, "Listing fetch failed");
                fetch_error = Some(e.to_string());
            }
        }

        if records.is_empty() {
            records = self.render_fallback(city, now).await;
        }

        let extracted = records.len();
        if records.is_empty() {
            info!(city = %city, "No events extracted, snapshot left untouched");
            return Ok(RunReport {
                city,
                extracted: 0,
                persisted: 0,
                fetch_error,
            });
        }

        let store = self.store_for(city, now.date())?;
        let existing = store.load().await?;
        let merged = merge(records, existing, now);
        store.save(&merged).await?;

        let persisted = merged.len();
        info!(city = %city, extracted, persisted, "Scrape complete");

        Ok(RunReport {
            city,
            extracted,
            persisted,
            fetch_error,
        })
    }

    /// Run every city in sequence with a cooldown between runs
    ///
    /// A fatal error in one city is recorded and the batch moves on.
    pub async fn run_all(&self, cities: &[City], cooldown: Duration) -> BatchReport {
        let mut report = BatchReport::default();

        for (i, &city) in cities.iter().enumerate() {
            if i > 0 && !cooldown.is_zero() {
                debug!(cooldown_ms = cooldown.as_millis(), "Cooling down between cities");
                tokio::time::sleep(cooldown).await;
            }

            match self.run_for_city(city).await {
                Ok(run) => report.reports.push(run),
                Err(e) => {
                    error!(city = %city, error = %e, "City run failed");
                    report.failed.push((city, e));
                }
            }
        }

        report
    }

    async fn render_fallback(&self, city: City, now: chrono::NaiveDateTime) -> Vec<EventRecord> {
        let Some(renderer) = &self.renderer else {
            return Vec::new();
        };

        let landing_path = city.landing_path();
        info!(city = %city, "Structural extraction empty, trying rendered landing page");

        match renderer.render(&landing_path).await {
            Ok(cards) => {
                let page_url = format!("{}{}", self.origin(), landing_path);
                let ctx = ExtractContext::new(city, now, page_url);
                self.cards.extract(ExtractSource::Cards(&cards), &ctx).await
            }
            Err(e) => {
                warn!(city = %city, error = %e, "Rendered-page fallback failed");
                Vec::new()
            }
        }
    }
}
