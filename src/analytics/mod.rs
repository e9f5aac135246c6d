//! Price history analytics
//!
//! Pure aggregations over one flight's ledger window.

mod aggregator;
mod types;

pub use aggregator::{
    demand_patterns, peak_booking_hour, price_range, revenue_opportunities, volatility,
};
pub use types::{DemandPatterns, FlightAnalytics, PeakHours, PriceRange, RevenueOpportunities};
