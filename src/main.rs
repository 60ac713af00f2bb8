use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "marquee",
    version,
    about = "Event listing scraper with tiered anti-bot fetching and snapshot reconciliation",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// Configuration file (TOML); environment variables are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape event listings for one city
    Scrape {
        /// City to scrape
        #[arg(short, long, default_value = "mumbai")]
        city: String,

        /// Maximum events to extract, overriding configured caps
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output directory for CSV snapshots
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scrape every supported city in sequence
    Batch {
        /// Cooldown between cities in seconds
        #[arg(long, default_value = "1")]
        cooldown: u64,
    },

    /// List supported cities and their platform codes
    Cities,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scrape {
            city,
            limit,
            output,
        } => {
            tracing::info!(
                city = %city,
                limit = ?limit,
                output = ?output,
                "Starting scrape command"
            );
            commands::scrape(config, city, limit, output).await?;
        }

        Commands::Batch { cooldown } => {
            tracing::info!(cooldown = %cooldown, "Starting batch command");
            commands::batch(config, cooldown).await?;
        }

        Commands::Cities => {
            commands::cities();
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("marquee=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("marquee=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
