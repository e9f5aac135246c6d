//! Forecast generation

use super::{DailyForecast, ForecastRecord};
use crate::config::ForecastConfig;
use crate::pricing::PricingError;
use crate::random::RandomSource;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Advisory notes attached to every forecast
const INSIGHTS: [&str; 3] = [
    "Demand follows a weekly cycle; weekend departures carry the strongest interest",
    "Promotional pricing recommended for low-demand periods",
    "Demand trends upward closer to departure; hold inventory for late bookers",
];

/// Generates and caches per-flight demand forecasts
pub struct ForecastGenerator {
    config: ForecastConfig,
    cache: HashMap<String, ForecastRecord>,
    rng: Box<dyn RandomSource>,
}

impl ForecastGenerator {
    pub fn new(config: ForecastConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            cache: HashMap::new(),
            rng,
        }
    }

    /// Cached forecast, never generating one
    pub fn cached(&self, flight_id: &str) -> Option<&ForecastRecord> {
        self.cache.get(flight_id)
    }

    /// Cached forecast, generating and caching it on first request
    pub fn get_or_generate(
        &mut self,
        flight_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ForecastRecord, PricingError> {
        if let Some(record) = self.cache.get(flight_id) {
            return Ok(record.clone());
        }

        let record = self.generate(flight_id, now)?;
        tracing::info!(
            flight_id,
            days = record.predictions.len(),
            "Forecast generated"
        );
        self.cache.insert(flight_id.to_string(), record.clone());
        Ok(record)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn generate(
        &mut self,
        flight_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ForecastRecord, PricingError> {
        let base = self.rng.uniform(0.3, 0.8);
        let today = now.date_naive();
        let mut predictions = Vec::with_capacity(self.config.horizon_days as usize);

        for day in 0..self.config.horizon_days {
            let d = f64::from(day);
            let trend = 1.0 + (d / 30.0) * 0.2;
            let seasonal = 1.0 + 0.3 * (2.0 * PI * d / 7.0).sin();
            let noise = self.rng.uniform(0.8, 1.2);
            let predicted_demand = round3((base * trend * seasonal * noise).clamp(0.1, 1.0));
            let confidence = round3(self.rng.uniform(0.7, 0.95));

            let discount = Decimal::try_from(2.0 - predicted_demand)
                .map_err(|e| PricingError::Internal(format!("forecast price conversion: {e}")))?;
            let recommended_price = (self.config.reference_fare * discount).round_dp(2);

            predictions.push(DailyForecast {
                day,
                date: today + Duration::days(i64::from(day)),
                predicted_demand,
                confidence,
                recommended_price,
            });
        }

        Ok(ForecastRecord {
            flight_id: flight_id.to_string(),
            generated_at: now,
            predictions,
            insights: INSIGHTS.iter().map(|s| s.to_string()).collect(),
        })
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
