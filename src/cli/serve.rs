//! Serve command implementation

use super::TrafficGenerator;
use crate::config::Config;
use crate::random::StdRandom;
use crate::service::FareService;
use chrono::Utc;
use clap::Args;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Milliseconds between synthetic pricing requests
    #[arg(long, default_value = "500")]
    pub traffic_interval_ms: u64,

    /// Number of distinct flights
    #[arg(long, default_value = "5")]
    pub flights: usize,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = FareService::new(config);
        let mut traffic = TrafficGenerator::new(self.flights, Box::new(StdRandom::from_entropy()));

        let mut refresh = interval(service.refresh_interval());
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        refresh.tick().await;

        let mut requests = interval(Duration::from_millis(self.traffic_interval_ms.max(1)));
        requests.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            refresh_secs = service.refresh_interval().as_secs(),
            flights = traffic.flights().len(),
            "Serving; press Ctrl-C to stop"
        );

        loop {
            tokio::select! {
                _ = refresh.tick() => {
                    service.refresh_demand().await;
                }
                _ = requests.tick() => {
                    let request = traffic.next_request(Utc::now());
                    if let Err(e) = service.compute_price(&request).await {
                        tracing::warn!(
                            flight_id = %request.flight_id,
                            error = %e,
                            "Request rejected"
                        );
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown requested");
                    break;
                }
            }
        }

        let status = service.status().await;
        tracing::info!(
            flights = status.tracked_flights,
            ledger_entries = status.ledger_entries,
            fraud_alerts = status.fraud_alerts,
            "Stopped"
        );
        Ok(())
    }
}
