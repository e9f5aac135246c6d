//! Forecast types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Prediction for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    /// Days from generation date, starting at 0
    pub day: u32,
    pub date: NaiveDate,
    /// Predicted demand in `[0.1, 1.0]`
    pub predicted_demand: f64,
    /// Confidence in `[0.7, 0.95]`
    pub confidence: f64,
    pub recommended_price: Decimal,
}

/// Cached forecast for one flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    pub flight_id: String,
    pub generated_at: DateTime<Utc>,
    pub predictions: Vec<DailyForecast>,
    pub insights: Vec<String>,
}

impl ForecastRecord {
    /// Day with the highest predicted demand
    pub fn peak_day(&self) -> Option<&DailyForecast> {
        self.predictions
            .iter()
            .max_by(|a, b| a.predicted_demand.total_cmp(&b.predicted_demand))
    }
}
