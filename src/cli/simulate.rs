//! Simulate command implementation

use super::{OutputFormat, TrafficGenerator};
use crate::config::Config;
use crate::random::{RandomSource, StdRandom};
use crate::service::FareService;
use chrono::Utc;
use clap::Args;
use serde_json::json;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of pricing requests to replay
    #[arg(long, default_value = "200")]
    pub requests: usize,

    /// Number of distinct flights
    #[arg(long, default_value = "5")]
    pub flights: usize,

    /// Run a demand refresh after this many requests (0 disables)
    #[arg(long, default_value = "50")]
    pub refresh_every: usize,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl SimulateArgs {
    fn random(&self, stream: u64) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => Box::new(StdRandom::seeded(seed.wrapping_add(stream))),
            None => Box::new(StdRandom::from_entropy()),
        }
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = FareService::with_random(config, self.random(0), self.random(1));
        let mut traffic = TrafficGenerator::new(self.flights, self.random(2));

        let mut rejected = 0usize;
        for i in 1..=self.requests {
            let request = traffic.next_request(Utc::now());
            if let Err(e) = service.compute_price(&request).await {
                tracing::warn!(flight_id = %request.flight_id, error = %e, "Request rejected");
                rejected += 1;
            }
            if self.refresh_every > 0 && i % self.refresh_every == 0 {
                service.refresh_demand().await;
            }
        }

        let mut reports = Vec::new();
        for flight_id in traffic.flights() {
            let analytics = service.analytics(flight_id).await;
            let forecast = service.forecast(flight_id).await?;
            reports.push((analytics, forecast));
        }
        let status = service.status().await;
        let alerts = service.fraud_alerts(10).await;

        match self.format {
            OutputFormat::Json => {
                let flights: Vec<_> = reports
                    .iter()
                    .map(|(analytics, forecast)| {
                        json!({ "analytics": analytics, "forecast": forecast })
                    })
                    .collect();
                let report = json!({
                    "status": status,
                    "rejected": rejected,
                    "flights": flights,
                    "recentAlerts": alerts,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Table => {
                for (analytics, forecast) in &reports {
                    print!("{}", analytics.format_table());
                    if let Some(peak) = forecast.peak_day() {
                        println!(
                            "Forecast peak:    {} (demand {:.2}, recommend {})",
                            peak.date, peak.predicted_demand, peak.recommended_price
                        );
                    }
                }
                println!();
                println!(
                    "Flights: {}  Ledger entries: {}  Fraud alerts: {}  Rejected: {}",
                    status.tracked_flights, status.ledger_entries, status.fraud_alerts, rejected
                );
            }
        }
        Ok(())
    }
}
