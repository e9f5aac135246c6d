//! Pricing types

use crate::demand::DemandLevel;
use crate::forecast::ForecastRecord;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pricing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Request rejected before any state was touched
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Lookup of something that does not exist
    #[error("Not found: {0}")]
    NotFound(String),
    /// Unexpected computation failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A request to price one flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPricingRequest {
    pub flight_id: String,
    /// Undiscounted fare, must be positive
    pub base_fare: Decimal,
    pub total_seats: u32,
    pub available_seats: u32,
    /// ISO-8601 date-time, naive or with offset / trailing `Z`
    pub departure_time: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub search_count: u32,
    #[serde(default)]
    pub is_group_booking: bool,
}

/// Which pricing rule produced a factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    SeatAvailability,
    TimeToDeparture,
    /// Demand factor, tagged with the level used
    Demand(DemandLevel),
    UserBehavior,
    EventImpact,
    FraudDiscount,
}

/// One multiplicative pricing factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingFactor {
    pub kind: FactorKind,
    pub multiplier: Decimal,
    /// `(multiplier - 1) * base_fare`, rounded to cents
    pub impact: Decimal,
    pub reason: String,
}

/// Factors with an absolute impact at or below this are hidden from the breakdown
const NEGLIGIBLE_IMPACT: Decimal = dec!(0.01);

impl PricingFactor {
    pub fn new(
        kind: FactorKind,
        multiplier: Decimal,
        base_fare: Decimal,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            multiplier,
            impact: ((multiplier - Decimal::ONE) * base_fare).round_dp(2),
            reason: reason.into(),
        }
    }

    /// True if the factor moves the price by more than a cent
    pub fn is_material(&self) -> bool {
        self.impact.abs() > NEGLIGIBLE_IMPACT
    }
}

/// Result of a pricing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceExplanation {
    pub flight_id: String,
    /// Final price, rounded to cents
    pub price: Decimal,
    /// `price / base_fare`, rounded to 2 dp
    pub multiplier: Decimal,
    pub base_fare: Decimal,
    pub total_seats: u32,
    pub available_seats: u32,
    /// Available seats as a percentage of capacity, before jitter
    pub seat_percentage: f64,
    pub hours_until_departure: f64,
    pub demand_level: DemandLevel,
    pub booking_count: u64,
    /// Material factors only
    pub factors: Vec<PricingFactor>,
    pub fraud_detected: bool,
    /// Cached forecast for this flight, if one was already generated
    pub forecast: Option<ForecastRecord>,
    pub computed_at: DateTime<Utc>,
}
