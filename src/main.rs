use clap::Parser;
use fare_engine::cli::{Cli, Commands};
use fare_engine::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    let _telemetry = fare_engine::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Quote(args) => {
            args.execute(&config).await?;
        }
        Commands::WhatIf(args) => {
            args.execute(&config).await?;
        }
        Commands::Simulate(args) => {
            tracing::info!(requests = args.requests, "Starting simulation");
            args.execute(&config).await?;
        }
        Commands::Serve(args) => {
            tracing::info!("Starting demand refresh loop");
            args.execute(&config).await?;
        }
        Commands::Events(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Pricing: floor={}x ceiling={}x event_probability={} frequent_search>{}",
                config.pricing.price_floor_ratio,
                config.pricing.price_ceiling_ratio,
                config.pricing.event_probability,
                config.pricing.frequent_search_threshold
            );
            println!(
                "  History: retention={}d",
                config.pricing.history_retention_days
            );
            println!(
                "  Demand: refresh={}s p={} window={} thresholds={}..{}",
                config.demand.refresh_interval_secs,
                config.demand.refresh_probability,
                config.demand.learning_window,
                config.demand.low_price_threshold,
                config.demand.high_price_threshold
            );
            println!("  Fraud: searches>{}", config.fraud.search_threshold);
            println!(
                "  Forecast: {} days @ {}",
                config.forecast.horizon_days, config.forecast.reference_fare
            );
            println!(
                "  Events: {}",
                if config.events.is_empty() {
                    "built-in catalog".to_string()
                } else {
                    format!("{} configured", config.events.len())
                }
            );
            println!(
                "  Telemetry: level={} format={:?} metrics_port={:?}",
                config.telemetry.log_level,
                config.telemetry.log_format,
                config.telemetry.metrics_port
            );
        }
    }

    Ok(())
}
