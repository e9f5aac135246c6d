//! Demand forecast module
//!
//! Synthetic multi-day demand projections, generated once per flight and
//! cached for the life of the process.

mod generator;
mod types;

pub use generator::ForecastGenerator;
pub use types::{DailyForecast, ForecastRecord};
