use anyhow::Result;
use std::time::Duration;

use marquee::config::Config;
use marquee::models::City;
use marquee::pipeline::Pipeline;

/// Scrape every supported city in sequence
pub async fn batch(config: Config, cooldown_secs: u64) -> Result<()> {
    let cities = City::all();
    let cooldown = Duration::from_secs(cooldown_secs);

    println!("Batch Scrape ({} cities)", cities.len());
    println!("========================");

    let pipeline = Pipeline::new(config);

    let report = tokio::select! {
        report = pipeline.run_all(&cities, cooldown) => report,
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutdown signal received, stopping...");
            return Ok(());
        }
    };

    println!();
    println!("Batch Summary");
    println!("=============");
    for run in &report.reports {
        match &run.fetch_error {
            Some(error) => println!(
                "  {:<10} extracted {:>3}, snapshot {:>3}  (fetch degraded: {error})",
                run.city.key(),
                run.extracted,
                run.persisted
            ),
            None => println!(
                "  {:<10} extracted {:>3}, snapshot {:>3}",
                run.city.key(),
                run.extracted,
                run.persisted
            ),
        }
    }
    for (city, error) in &report.failed {
        println!("  {:<10} FAILED: {error}", city.key());
    }

    println!();
    println!("Total extracted: {}", report.total_extracted());
    if !report.failed.is_empty() {
        println!("Cities failed: {}", report.failed.len());
    }

    Ok(())
}
