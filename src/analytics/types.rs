//! Analytics types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price extremes over the window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
    pub average: Decimal,
    /// Most recent price
    pub current: Decimal,
}

/// Busiest hour of day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakHours {
    /// Hour of day, 0-23 (UTC)
    pub hour: u32,
    pub count: usize,
}

impl Default for PeakHours {
    fn default() -> Self {
        Self { hour: 12, count: 0 }
    }
}

/// Surge and discount frequency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandPatterns {
    /// Share of entries with multiplier above 1.5
    pub surge_ratio: f64,
    /// Share of entries with multiplier below 0.95
    pub discount_ratio: f64,
    pub high_surge_frequency: bool,
    pub frequent_discounts: bool,
    /// Human-readable pattern flags
    pub flags: Vec<String>,
}

/// Revenue left on the table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueOpportunities {
    /// Sum of the shortfall below the mean price across surge-demand entries
    pub missed_revenue: Decimal,
    /// Entries priced below 80% of the mean
    pub underpriced_count: usize,
}

/// Full analytics report for one flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightAnalytics {
    pub flight_id: String,
    pub entries: usize,
    pub price_range: PriceRange,
    pub volatility: f64,
    pub peak_hours: PeakHours,
    pub demand_patterns: DemandPatterns,
    pub revenue_opportunities: RevenueOpportunities,
}

impl FlightAnalytics {
    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        format!(
            r#"
══════════════════════════════════════════════════════
  ANALYTICS: {}
══════════════════════════════════════════════════════
Entries:          {}
Price range:      {:.2} - {:.2} (avg {:.2}, now {:.2})
Volatility:       {:.2}%
Peak hour:        {:02}:00 ({} quotes)
Surge ratio:      {:.1}%
Discount ratio:   {:.1}%
Flags:            {}
Missed revenue:   {:.2} ({} underpriced)
══════════════════════════════════════════════════════
"#,
            self.flight_id,
            self.entries,
            self.price_range.min,
            self.price_range.max,
            self.price_range.average,
            self.price_range.current,
            self.volatility * 100.0,
            self.peak_hours.hour,
            self.peak_hours.count,
            self.demand_patterns.surge_ratio * 100.0,
            self.demand_patterns.discount_ratio * 100.0,
            if self.demand_patterns.flags.is_empty() {
                "none".to_string()
            } else {
                self.demand_patterns.flags.join(", ")
            },
            self.revenue_opportunities.missed_revenue,
            self.revenue_opportunities.underpriced_count,
        )
    }
}
