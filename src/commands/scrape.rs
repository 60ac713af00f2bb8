use anyhow::{Context, Result};
use std::path::PathBuf;

use marquee::config::Config;
use marquee::models::City;
use marquee::pipeline::Pipeline;

/// Scrape one city and persist the reconciled snapshot
pub async fn scrape(
    mut config: Config,
    city: String,
    limit: Option<usize>,
    output: Option<PathBuf>,
) -> Result<()> {
    if let Some(limit) = limit {
        config.extract.max_structural_events = limit;
        config.extract.max_card_events = limit;
    }
    if let Some(output) = output {
        config.store.output_dir = output;
    }

    // Unknown city names fall back to the default rather than failing,
    // matching the platform city table
    let city = match City::parse(&city) {
        Some(city) => city,
        None => {
            tracing::warn!(city = %city, "Unknown city, using Mumbai");
            City::Mumbai
        }
    };

    println!("Event Listing Scrape");
    println!("====================");
    println!("City: {}", city.display_name());

    let pipeline = Pipeline::new(config);
    let report = pipeline
        .run_for_city(city)
        .await
        .with_context(|| format!("Scrape failed for {}", city.display_name()))?;

    println!();
    println!("Found {} events", report.extracted);
    if let Some(error) = &report.fetch_error {
        println!("Fetch degraded: {error}");
    }
    if report.persisted > 0 {
        println!("Snapshot now holds {} records", report.persisted);
    } else {
        println!("Nothing to persist, existing snapshot left untouched");
    }

    Ok(())
}
