//! Demand types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulated booking interest for a flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandLevel {
    Low,
    Medium,
    High,
    Surge,
}

impl DemandLevel {
    /// All levels, lowest first
    pub const ALL: [DemandLevel; 4] = [
        DemandLevel::Low,
        DemandLevel::Medium,
        DemandLevel::High,
        DemandLevel::Surge,
    ];

    /// Levels a new flight can start in
    pub const INITIAL: [DemandLevel; 3] =
        [DemandLevel::Low, DemandLevel::Medium, DemandLevel::High];

    /// Levels a demand spike can land on
    pub const SPIKE: [DemandLevel; 2] = [DemandLevel::High, DemandLevel::Surge];

    /// Price multiplier for this level
    pub fn multiplier(self) -> Decimal {
        match self {
            DemandLevel::Low => dec!(0.9),
            DemandLevel::Medium => dec!(1.0),
            DemandLevel::High => dec!(1.3),
            DemandLevel::Surge => dec!(1.7),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DemandLevel::Low => "low",
            DemandLevel::Medium => "medium",
            DemandLevel::High => "high",
            DemandLevel::Surge => "surge",
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of recent demand movement (informational)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl DemandTrend {
    /// Trend implied by a level change
    pub fn between(from: DemandLevel, to: DemandLevel) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => DemandTrend::Increasing,
            std::cmp::Ordering::Equal => DemandTrend::Stable,
            std::cmp::Ordering::Less => DemandTrend::Decreasing,
        }
    }
}

/// Demand state for one flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandRecord {
    pub level: DemandLevel,
    /// Cumulative simulated bookings; never decreases
    pub booking_count: u64,
    /// Probability of a spike on the next price call, in `[0, 1]`
    pub spike_probability: f64,
    pub trend: DemandTrend,
}
