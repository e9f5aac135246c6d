//! Analytics over a price history window

use super::{DemandPatterns, FlightAnalytics, PeakHours, PriceRange, RevenueOpportunities};
use crate::demand::DemandLevel;
use crate::history::PriceHistoryEntry;
use chrono::Timelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SURGE_MULTIPLIER: Decimal = dec!(1.5);
const DISCOUNT_MULTIPLIER: Decimal = dec!(0.95);
const SURGE_RATIO_FLAG: f64 = 0.3;
const DISCOUNT_RATIO_FLAG: f64 = 0.2;
const UNDERPRICED_RATIO: Decimal = dec!(0.8);

impl FlightAnalytics {
    /// Aggregate a chronological history window
    pub fn from_history(flight_id: &str, entries: &[PriceHistoryEntry]) -> Self {
        Self {
            flight_id: flight_id.to_string(),
            entries: entries.len(),
            price_range: price_range(entries),
            volatility: volatility(entries),
            peak_hours: peak_booking_hour(entries),
            demand_patterns: demand_patterns(entries),
            revenue_opportunities: revenue_opportunities(entries),
        }
    }
}

/// Mean price; `None` for an empty window.
///
/// Windows whose total overflows are averaged term by term instead.
fn mean_price(entries: &[PriceHistoryEntry]) -> Option<Decimal> {
    let count = Decimal::from(entries.len());
    match entries
        .iter()
        .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.price))
    {
        Some(total) => total.checked_div(count),
        None => entries.iter().try_fold(Decimal::ZERO, |acc, e| {
            e.price.checked_div(count).and_then(|share| acc.checked_add(share))
        }),
    }
}

/// Min, max, mean and latest price; all zero for an empty window
pub fn price_range(entries: &[PriceHistoryEntry]) -> PriceRange {
    let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
        return PriceRange::default();
    };
    let Some(average) = mean_price(entries) else {
        return PriceRange::default();
    };

    let (min, max) = entries.iter().fold((first.price, first.price), |(lo, hi), e| {
        (lo.min(e.price), hi.max(e.price))
    });
    PriceRange {
        min,
        max,
        average: average.round_dp(2),
        current: last.price,
    }
}

/// Mean absolute relative change between consecutive prices
pub fn volatility(entries: &[PriceHistoryEntry]) -> f64 {
    let changes: Vec<f64> = entries
        .windows(2)
        .filter_map(|pair| {
            let delta = pair[1].price.checked_sub(pair[0].price)?;
            delta.checked_div(pair[0].price)?.abs().to_f64()
        })
        .collect();

    if changes.is_empty() {
        return 0.0;
    }
    changes.iter().sum::<f64>() / changes.len() as f64
}

/// Hour of day with the most entries; ties go to the earlier hour
pub fn peak_booking_hour(entries: &[PriceHistoryEntry]) -> PeakHours {
    let mut counts = [0usize; 24];
    for entry in entries {
        counts[entry.timestamp.hour() as usize] += 1;
    }

    let mut peak = PeakHours::default();
    for (hour, &count) in counts.iter().enumerate() {
        if count > peak.count {
            peak = PeakHours {
                hour: hour as u32,
                count,
            };
        }
    }
    peak
}

/// Surge and discount ratios with their flags
pub fn demand_patterns(entries: &[PriceHistoryEntry]) -> DemandPatterns {
    if entries.is_empty() {
        return DemandPatterns::default();
    }

    let total = entries.len() as f64;
    let surges = entries.iter().filter(|e| e.multiplier > SURGE_MULTIPLIER).count();
    let discounts = entries.iter().filter(|e| e.multiplier < DISCOUNT_MULTIPLIER).count();
    let surge_ratio = surges as f64 / total;
    let discount_ratio = discounts as f64 / total;

    let high_surge_frequency = surge_ratio > SURGE_RATIO_FLAG;
    let frequent_discounts = discount_ratio > DISCOUNT_RATIO_FLAG;
    let mut flags = Vec::new();
    if high_surge_frequency {
        flags.push("high surge frequency".to_string());
    }
    if frequent_discounts {
        flags.push("frequent discounts".to_string());
    }

    DemandPatterns {
        surge_ratio,
        discount_ratio,
        high_surge_frequency,
        frequent_discounts,
        flags,
    }
}

/// Shortfall below the mean on surge-demand entries, plus underpriced count
pub fn revenue_opportunities(entries: &[PriceHistoryEntry]) -> RevenueOpportunities {
    let Some(mean) = mean_price(entries) else {
        return RevenueOpportunities::default();
    };

    let missed_revenue = entries
        .iter()
        .filter(|e| e.demand_level() == Some(DemandLevel::Surge))
        .map(|e| mean.saturating_sub(e.price).max(Decimal::ZERO))
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let threshold = mean * UNDERPRICED_RATIO;
    let underpriced_count = entries.iter().filter(|e| e.price < threshold).count();

    RevenueOpportunities {
        missed_revenue: missed_revenue.round_dp(2),
        underpriced_count,
    }
}
