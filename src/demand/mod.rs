//! Demand state module
//!
//! Simulated per-flight demand: a categorical level, a cumulative booking
//! count and a drifting spike probability.

mod store;
mod types;

pub use store::{flight_signal, DemandStore, RefreshSummary};
pub use types::{DemandLevel, DemandRecord, DemandTrend};
