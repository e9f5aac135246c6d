//! Hypothetical pricing scenarios
//!
//! A scenario perturbs a fixed reference flight snapshot and prices it twice,
//! once as-is and once perturbed, against throwaway state. Both runs draw from
//! identically seeded randomness so the difference isolates the scenario.

use super::{FlightPricingRequest, MarketState, PriceExplanation, PricingEngine, PricingError};
use crate::demand::{DemandLevel, DemandRecord};
use crate::random::{stable_hash, StdRandom};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named hypothetical adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Fare raised by `value` percent
    FuelIncrease,
    /// Available seats forced to half of capacity
    HalfEmpty,
    /// Fare lowered by `value` percent
    CompetitorPriceDrop,
    /// Demand pinned to surge before the call
    DemandSpike,
    /// Fare raised by `value` percent
    WeatherDelay,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 5] = [
        ScenarioKind::FuelIncrease,
        ScenarioKind::HalfEmpty,
        ScenarioKind::CompetitorPriceDrop,
        ScenarioKind::DemandSpike,
        ScenarioKind::WeatherDelay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioKind::FuelIncrease => "fuel_increase",
            ScenarioKind::HalfEmpty => "half_empty",
            ScenarioKind::CompetitorPriceDrop => "competitor_price_drop",
            ScenarioKind::DemandSpike => "demand_spike",
            ScenarioKind::WeatherDelay => "weather_delay",
        }
    }

    fn summary(self, value: Decimal) -> String {
        match self {
            ScenarioKind::FuelIncrease => format!(
                "Fuel cost increase of {value}% raises the base fare; \
                 carriers typically pass most fuel cost through to passengers."
            ),
            ScenarioKind::HalfEmpty => {
                "With half the seats unsold, lower prices are needed to stimulate demand \
                 and avoid revenue loss."
                    .to_string()
            }
            ScenarioKind::CompetitorPriceDrop => format!(
                "Competitors cutting fares by {value}% forces a matching base fare \
                 to hold market share."
            ),
            ScenarioKind::DemandSpike => {
                "A sudden demand surge lets dynamic pricing capture additional revenue.".to_string()
            }
            ScenarioKind::WeatherDelay => format!(
                "Weather disruption adds {value}% to the base fare \
                 as travelers pay for a guaranteed departure."
            ),
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| PricingError::InvalidInput(format!("unknown scenario: {s:?}")))
    }
}

/// Fixed flight snapshot every scenario starts from
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFlight {
    pub base_fare: Decimal,
    pub total_seats: u32,
    pub available_seats: u32,
    pub hours_to_departure: i64,
}

impl Default for ReferenceFlight {
    fn default() -> Self {
        Self {
            base_fare: dec!(5000),
            total_seats: 180,
            available_seats: 126,
            hours_to_departure: 120,
        }
    }
}

impl ReferenceFlight {
    fn request(&self, flight_id: &str, now: DateTime<Utc>) -> FlightPricingRequest {
        FlightPricingRequest {
            flight_id: flight_id.to_string(),
            base_fare: self.base_fare,
            total_seats: self.total_seats,
            available_seats: self.available_seats,
            departure_time: (now + Duration::hours(self.hours_to_departure))
                .to_rfc3339_opts(SecondsFormat::Nanos, true),
            user_id: None,
            search_count: 0,
            is_group_booking: false,
        }
    }
}

/// Outcome of a what-if run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatIfResult {
    pub scenario: ScenarioKind,
    pub flight_id: String,
    pub original_price: Decimal,
    pub new_price: Decimal,
    pub change: Decimal,
    /// Relative change in percent, 2 dp
    pub change_percent: Decimal,
    /// Breakdown of the perturbed run
    pub explanation: PriceExplanation,
    pub summary: String,
}

impl PricingEngine {
    /// Price the reference snapshot with and without a scenario applied.
    ///
    /// `demand` is the flight's current demand record, if any; it is cloned
    /// into scratch state and never written back.
    pub fn what_if(
        &self,
        scenario: ScenarioKind,
        value: Decimal,
        flight_id: &str,
        demand: Option<DemandRecord>,
        now: DateTime<Utc>,
    ) -> Result<WhatIfResult, PricingError> {
        if value.is_sign_negative() {
            return Err(PricingError::InvalidInput(format!(
                "scenario value must not be negative, got {value}"
            )));
        }
        if scenario == ScenarioKind::CompetitorPriceDrop && value >= dec!(100) {
            return Err(PricingError::InvalidInput(format!(
                "price drop must be below 100%, got {value}"
            )));
        }

        let seed = stable_hash(flight_id);
        let reference = ReferenceFlight::default();
        let baseline_demand =
            demand.unwrap_or_else(|| DemandRecord::seed(flight_id, &mut StdRandom::seeded(seed)));

        let baseline_request = reference.request(flight_id, now);
        let mut baseline_state = MarketState::scratch(
            flight_id,
            Some(baseline_demand.clone()),
            Box::new(StdRandom::seeded(seed)),
        );
        let original = self.compute(&mut baseline_state, &baseline_request, now)?;

        let mut request = baseline_request;
        let mut scenario_demand = baseline_demand;
        let percent = value / dec!(100);
        match scenario {
            ScenarioKind::FuelIncrease | ScenarioKind::WeatherDelay => {
                request.base_fare = scale_fare(request.base_fare, Decimal::ONE + percent, value)?;
            }
            ScenarioKind::CompetitorPriceDrop => {
                request.base_fare = scale_fare(request.base_fare, Decimal::ONE - percent, value)?;
            }
            ScenarioKind::HalfEmpty => {
                request.available_seats = request.total_seats / 2;
            }
            ScenarioKind::DemandSpike => {
                scenario_demand.level = DemandLevel::Surge;
            }
        }

        let mut scenario_state = MarketState::scratch(
            flight_id,
            Some(scenario_demand),
            Box::new(StdRandom::seeded(seed)),
        );
        let explanation = self.compute(&mut scenario_state, &request, now)?;

        let change = explanation.price - original.price;
        let change_percent = change
            .checked_div(original.price)
            .map(|ratio| (ratio * dec!(100)).round_dp(2))
            .ok_or_else(|| PricingError::Internal("original price is zero".to_string()))?;

        tracing::info!(
            flight_id,
            scenario = %scenario,
            %value,
            original = %original.price,
            new = %explanation.price,
            "What-if evaluated"
        );

        Ok(WhatIfResult {
            scenario,
            flight_id: flight_id.to_string(),
            original_price: original.price,
            new_price: explanation.price,
            change,
            change_percent,
            explanation,
            summary: scenario.summary(value),
        })
    }
}

/// `fare × factor` to cents, rejecting scenario values that overflow the fare
fn scale_fare(fare: Decimal, factor: Decimal, value: Decimal) -> Result<Decimal, PricingError> {
    fare.checked_mul(factor)
        .map(|scaled| scaled.round_dp(2))
        .ok_or_else(|| PricingError::InvalidInput(format!("scenario value {value} is too large")))
}
