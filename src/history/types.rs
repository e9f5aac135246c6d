//! Price history types

use crate::demand::DemandLevel;
use crate::pricing::{FactorKind, PricingFactor};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One computed price, immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
    pub multiplier: Decimal,
    /// Every factor applied, including negligible ones
    pub factors: Vec<PricingFactor>,
}

impl PriceHistoryEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        price: Decimal,
        multiplier: Decimal,
        factors: Vec<PricingFactor>,
    ) -> Self {
        Self {
            timestamp,
            price,
            multiplier,
            factors,
        }
    }

    /// Demand level recorded in the factor breakdown, if any
    pub fn demand_level(&self) -> Option<DemandLevel> {
        self.factors.iter().find_map(|f| match f.kind {
            FactorKind::Demand(level) => Some(level),
            _ => None,
        })
    }
}
