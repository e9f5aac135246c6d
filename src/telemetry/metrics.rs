//! Prometheus metrics

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Successful price computations
    PriceComputations,
    /// Demand spikes triggered by price calls
    DemandSpikes,
    /// Fraud alerts logged
    FraudAlerts,
    /// Background demand refresh passes
    DemandRefreshes,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Flights with a demand record
    TrackedFlights,
    /// Price history entries across all flights
    LedgerEntries,
    /// Cached forecasts
    CachedForecasts,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::PriceComputations => "fare_engine_price_computations_total",
            CounterMetric::DemandSpikes => "fare_engine_demand_spikes_total",
            CounterMetric::FraudAlerts => "fare_engine_fraud_alerts_total",
            CounterMetric::DemandRefreshes => "fare_engine_demand_refreshes_total",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::TrackedFlights => "fare_engine_tracked_flights",
            GaugeMetric::LedgerEntries => "fare_engine_ledger_entries",
            GaugeMetric::CachedForecasts => "fare_engine_cached_forecasts",
        }
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    ::metrics::counter!(metric.name()).increment(1);
}

/// Record a committed price's effective multiplier
pub fn record_price(multiplier: Decimal) {
    increment(CounterMetric::PriceComputations);
    let value = multiplier.to_f64().unwrap_or_default();
    ::metrics::histogram!("fare_engine_price_multiplier").record(value);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    ::metrics::gauge!(metric.name()).set(value);
    tracing::trace!(metric = metric.name(), value, "Setting gauge");
}
