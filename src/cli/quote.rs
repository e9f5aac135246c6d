//! Quote command implementation

use crate::config::Config;
use crate::pricing::FlightPricingRequest;
use crate::service::FareService;
use chrono::{Duration, SecondsFormat, Utc};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Flight identifier
    #[arg(long)]
    pub flight: String,

    /// Base fare
    #[arg(long)]
    pub base_fare: Decimal,

    /// Seat capacity
    #[arg(long, default_value = "180")]
    pub total_seats: u32,

    /// Seats still available
    #[arg(long)]
    pub available_seats: u32,

    /// Departure time (ISO 8601); defaults to 72 hours from now
    #[arg(long)]
    pub departure: Option<String>,

    /// Requesting user
    #[arg(long)]
    pub user: Option<String>,

    /// Search attempts for this flight
    #[arg(long, default_value = "0")]
    pub searches: u32,

    /// Group booking
    #[arg(long)]
    pub group: bool,
}

impl QuoteArgs {
    fn request(&self) -> FlightPricingRequest {
        let departure_time = self.departure.clone().unwrap_or_else(|| {
            (Utc::now() + Duration::hours(72)).to_rfc3339_opts(SecondsFormat::Secs, true)
        });
        FlightPricingRequest {
            flight_id: self.flight.clone(),
            base_fare: self.base_fare,
            total_seats: self.total_seats,
            available_seats: self.available_seats,
            departure_time,
            user_id: self.user.clone(),
            search_count: self.searches,
            is_group_booking: self.group,
        }
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = FareService::new(config);
        let explanation = service.compute_price(&self.request()).await?;
        println!("{}", serde_json::to_string_pretty(&explanation)?);
        Ok(())
    }
}
