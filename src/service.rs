//! Fare service
//!
//! Boundary operations over the pricing engine and its shared state. All
//! mutations of demand, ledger and fraud log go through one write lock, so a
//! pricing call and a background refresh never interleave.

use crate::analytics::FlightAnalytics;
use crate::config::{Config, DemandConfig};
use crate::demand::{DemandRecord, RefreshSummary};
use crate::events::{EventCatalog, EventRecord};
use crate::forecast::{ForecastGenerator, ForecastRecord};
use crate::fraud::FraudAlert;
use crate::history::PriceHistoryEntry;
use crate::pricing::{
    FlightPricingRequest, MarketState, PriceExplanation, PricingEngine, PricingError,
    ScenarioKind, WhatIfResult,
};
use crate::random::{RandomSource, StdRandom};
use crate::telemetry::{increment, set_gauge, CounterMetric, GaugeMetric};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default history window for queries (days)
pub const DEFAULT_HISTORY_DAYS: i64 = 30;

/// Default number of fraud alerts returned
pub const DEFAULT_ALERT_LIMIT: usize = 50;

/// Engine-wide counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub tracked_flights: usize,
    pub ledger_entries: usize,
    pub fraud_alerts: usize,
    pub cached_forecasts: usize,
    pub catalog_events: usize,
}

/// Shared handle to the pricing engine and its state
#[derive(Clone)]
pub struct FareService {
    engine: Arc<PricingEngine>,
    demand_config: DemandConfig,
    state: Arc<RwLock<MarketState>>,
    forecasts: Arc<RwLock<ForecastGenerator>>,
}

impl FareService {
    /// Build a service with entropy-seeded randomness
    pub fn new(config: &Config) -> Self {
        Self::with_random(
            config,
            Box::new(StdRandom::from_entropy()),
            Box::new(StdRandom::from_entropy()),
        )
    }

    /// Build a service with explicit random sources for pricing and forecasts
    pub fn with_random(
        config: &Config,
        pricing_rng: Box<dyn RandomSource>,
        forecast_rng: Box<dyn RandomSource>,
    ) -> Self {
        let events = if config.events.is_empty() {
            EventCatalog::builtin()
        } else {
            EventCatalog::new(config.events.clone())
        };

        Self {
            engine: Arc::new(PricingEngine::new(config.pricing.clone(), Arc::new(events))),
            demand_config: config.demand.clone(),
            state: Arc::new(RwLock::new(MarketState::new(config, pricing_rng))),
            forecasts: Arc::new(RwLock::new(ForecastGenerator::new(
                config.forecast.clone(),
                forecast_rng,
            ))),
        }
    }

    /// Price a request now
    pub async fn compute_price(
        &self,
        request: &FlightPricingRequest,
    ) -> Result<PriceExplanation, PricingError> {
        self.compute_price_at(request, Utc::now()).await
    }

    /// Price a request as of `now`.
    ///
    /// Attaches the flight's forecast only if one is already cached.
    pub async fn compute_price_at(
        &self,
        request: &FlightPricingRequest,
        now: DateTime<Utc>,
    ) -> Result<PriceExplanation, PricingError> {
        let result = {
            let mut state = self.state.write().await;
            let result = self.engine.compute(&mut state, request, now);
            if result.is_ok() {
                publish_state_gauges(&state);
            }
            result
        };

        let mut explanation = match result {
            Ok(explanation) => explanation,
            Err(e) => {
                match &e {
                    PricingError::Internal(_) => {
                        tracing::error!(
                            flight_id = %request.flight_id,
                            error = %e,
                            "Pricing failed"
                        )
                    }
                    _ => tracing::debug!(
                        flight_id = %request.flight_id,
                        error = %e,
                        "Pricing rejected"
                    ),
                }
                return Err(e);
            }
        };

        explanation.forecast = self.forecasts.read().await.cached(&request.flight_id).cloned();
        Ok(explanation)
    }

    /// Current demand record for a flight that has been priced at least once
    pub async fn demand_snapshot(&self, flight_id: &str) -> Result<DemandRecord, PricingError> {
        self.state
            .read()
            .await
            .demand
            .get(flight_id)
            .cloned()
            .ok_or_else(|| {
                PricingError::NotFound(format!("no demand record for flight {flight_id}"))
            })
    }

    /// Price history over the last `days` days, oldest first
    pub async fn price_history(&self, flight_id: &str, days: i64) -> Vec<PriceHistoryEntry> {
        self.price_history_at(flight_id, days, Utc::now()).await
    }

    pub async fn price_history_at(
        &self,
        flight_id: &str,
        days: i64,
        now: DateTime<Utc>,
    ) -> Vec<PriceHistoryEntry> {
        self.state.read().await.ledger.query(flight_id, days, now)
    }

    /// Forecast for a flight, generated and cached on first request
    pub async fn forecast(&self, flight_id: &str) -> Result<ForecastRecord, PricingError> {
        if let Some(cached) = self.forecasts.read().await.cached(flight_id) {
            return Ok(cached.clone());
        }

        let mut forecasts = self.forecasts.write().await;
        let record = forecasts.get_or_generate(flight_id, Utc::now())?;
        set_gauge(GaugeMetric::CachedForecasts, forecasts.len() as f64);
        Ok(record)
    }

    /// Run a hypothetical scenario against the reference flight snapshot
    pub async fn what_if(
        &self,
        scenario: ScenarioKind,
        value: Decimal,
        flight_id: &str,
    ) -> Result<WhatIfResult, PricingError> {
        let demand = self.state.read().await.demand.get(flight_id).cloned();
        self.engine.what_if(scenario, value, flight_id, demand, Utc::now())
    }

    pub fn list_events(&self) -> Vec<EventRecord> {
        self.engine.events().all().to_vec()
    }

    /// Events whose window contains `date`
    pub fn active_events(&self, date: NaiveDate) -> Vec<EventRecord> {
        self.engine
            .events()
            .active_on(date)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The most recent `limit` fraud alerts, oldest first
    pub async fn fraud_alerts(&self, limit: usize) -> Vec<FraudAlert> {
        self.state.read().await.fraud.recent_alerts(limit)
    }

    /// Analytics over the flight's full retained history
    pub async fn analytics(&self, flight_id: &str) -> FlightAnalytics {
        let history = self.price_history(flight_id, DEFAULT_HISTORY_DAYS).await;
        FlightAnalytics::from_history(flight_id, &history)
    }

    /// One background demand refresh pass
    pub async fn refresh_demand(&self) -> RefreshSummary {
        self.refresh_demand_at(Utc::now()).await
    }

    pub async fn refresh_demand_at(&self, now: DateTime<Utc>) -> RefreshSummary {
        let mut state = self.state.write().await;
        let summary = state.refresh_demand(&self.demand_config, now);
        publish_state_gauges(&state);
        drop(state);

        increment(CounterMetric::DemandRefreshes);
        tracing::info!(
            flights = summary.flights,
            reassigned = summary.reassigned,
            adjusted = summary.adjusted,
            "Demand refreshed"
        );
        summary
    }

    pub async fn status(&self) -> EngineStatus {
        let (tracked_flights, ledger_entries, fraud_alerts) = {
            let state = self.state.read().await;
            (
                state.demand.len(),
                state.ledger.total_entries(),
                state.fraud.alert_count(),
            )
        };
        EngineStatus {
            tracked_flights,
            ledger_entries,
            fraud_alerts,
            cached_forecasts: self.forecasts.read().await.len(),
            catalog_events: self.engine.events().len(),
        }
    }

    /// Configured interval between demand refreshes
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.demand_config.refresh_interval_secs.max(1))
    }
}

fn publish_state_gauges(state: &MarketState) {
    set_gauge(GaugeMetric::TrackedFlights, state.demand.len() as f64);
    set_gauge(GaugeMetric::LedgerEntries, state.ledger.total_entries() as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::DemandLevel;
    use crate::random::ScriptedRandom;
    use chrono::{Duration, SecondsFormat};
    use rust_decimal_macros::dec;

    fn service() -> FareService {
        FareService::with_random(
            &Config::default(),
            Box::new(StdRandom::seeded(7)),
            Box::new(StdRandom::seeded(8)),
        )
    }

    fn request(flight_id: &str, now: DateTime<Utc>) -> FlightPricingRequest {
        FlightPricingRequest {
            flight_id: flight_id.to_string(),
            base_fare: dec!(5000),
            total_seats: 180,
            available_seats: 120,
            departure_time: (now + Duration::hours(48)).to_rfc3339_opts(SecondsFormat::Nanos, true),
            user_id: Some("traveler-1".to_string()),
            search_count: 3,
            is_group_booking: false,
        }
    }

    #[tokio::test]
    async fn test_compute_then_snapshot() {
        let svc = service();
        assert!(matches!(
            svc.demand_snapshot("AI-101").await,
            Err(PricingError::NotFound(_))
        ));

        let quote = svc.compute_price(&request("AI-101", Utc::now())).await.unwrap();
        let snapshot = svc.demand_snapshot("AI-101").await.unwrap();
        assert_eq!(snapshot.level, quote.demand_level);
        assert_eq!(snapshot.booking_count, quote.booking_count);
    }

    #[tokio::test]
    async fn test_forecast_attached_only_when_cached() {
        let svc = service();
        let quote = svc.compute_price(&request("AI-101", Utc::now())).await.unwrap();
        assert!(quote.forecast.is_none());
        assert_eq!(svc.status().await.cached_forecasts, 0);

        let forecast = svc.forecast("AI-101").await.unwrap();
        let quote = svc.compute_price(&request("AI-101", Utc::now())).await.unwrap();
        assert_eq!(quote.forecast, Some(forecast));
    }

    #[tokio::test]
    async fn test_history_is_stable_between_reads() {
        let svc = service();
        let now = Utc::now();
        for _ in 0..3 {
            svc.compute_price_at(&request("AI-101", now), now).await.unwrap();
        }
        let a = svc.price_history_at("AI-101", DEFAULT_HISTORY_DAYS, now).await;
        let b = svc.price_history_at("AI-101", DEFAULT_HISTORY_DAYS, now).await;
        assert_eq!(a.len(), 3);
        assert_eq!(a, b);
        assert!(svc.price_history("UNKNOWN", 30).await.is_empty());
    }

    #[tokio::test]
    async fn test_history_with_extreme_day_counts() {
        let svc = service();
        let now = Utc::now();
        svc.compute_price_at(&request("AI-101", now), now).await.unwrap();

        assert_eq!(svc.price_history("AI-101", i64::MAX).await.len(), 1);
        assert!(svc.price_history("AI-101", i64::MIN).await.is_empty());
    }

    #[tokio::test]
    async fn test_old_entries_trimmed_on_append() {
        let svc = service();
        let now = Utc::now();
        let then = now - Duration::days(31);

        svc.compute_price_at(&request("AI-101", then), then).await.unwrap();
        svc.compute_price_at(&request("AI-101", now), now).await.unwrap();

        let history = svc.price_history_at("AI-101", 365, now).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].timestamp, now);
        assert_eq!(svc.status().await.ledger_entries, 1);
    }

    #[tokio::test]
    async fn test_rejected_request_leaves_state_untouched() {
        let svc = service();
        let mut bad = request("AI-101", Utc::now());
        bad.total_seats = 0;
        bad.available_seats = 0;

        assert!(matches!(
            svc.compute_price(&bad).await,
            Err(PricingError::InvalidInput(_))
        ));
        let status = svc.status().await;
        assert_eq!(status.tracked_flights, 0);
        assert_eq!(status.ledger_entries, 0);
    }

    #[tokio::test]
    async fn test_fraud_alerts_accumulate() {
        let svc = service();
        let mut req = request("AI-101", Utc::now());
        req.search_count = 75;

        svc.compute_price(&req).await.unwrap();
        let second = svc.compute_price(&req).await.unwrap();
        assert!(second.fraud_detected);

        let alerts = svc.fraud_alerts(DEFAULT_ALERT_LIMIT).await;
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[1].reasons.len(), 2);
        assert_eq!(svc.fraud_alerts(1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_what_if_does_not_mutate_state() {
        let svc = service();
        svc.compute_price(&request("AI-101", Utc::now())).await.unwrap();
        let before = svc.status().await;
        let snapshot = svc.demand_snapshot("AI-101").await.unwrap();

        let result = svc
            .what_if(ScenarioKind::HalfEmpty, dec!(0), "AI-101")
            .await
            .unwrap();
        assert_eq!(result.explanation.seat_percentage, 50.0);

        assert_eq!(svc.status().await, before);
        assert_eq!(svc.demand_snapshot("AI-101").await.unwrap(), snapshot);
        assert!(svc.demand_snapshot("ZZ-1").await.is_err());
        svc.what_if(ScenarioKind::DemandSpike, dec!(0), "ZZ-1").await.unwrap();
        assert!(svc.demand_snapshot("ZZ-1").await.is_err());
    }

    #[tokio::test]
    async fn test_refresh_reassigns_every_flight() {
        // every draw lands on 0.0: refresh gate passes, level becomes low
        let svc = FareService::with_random(
            &Config::default(),
            Box::new(ScriptedRandom::constant(0.0)),
            Box::new(StdRandom::seeded(1)),
        );
        svc.compute_price(&request("AI-101", Utc::now())).await.unwrap();
        svc.compute_price(&request("UK-955", Utc::now())).await.unwrap();

        let summary = svc.refresh_demand().await;
        assert_eq!(summary.flights, 2);
        assert_eq!(summary.reassigned, 2);
        assert_eq!(
            svc.demand_snapshot("AI-101").await.unwrap().level,
            DemandLevel::Low
        );
    }

    #[tokio::test]
    async fn test_analytics_over_history() {
        let svc = service();
        let now = Utc::now();
        for i in 0..5 {
            let mut req = request("AI-101", now);
            req.available_seats = 150 - i * 30;
            svc.compute_price(&req).await.unwrap();
        }

        let report = svc.analytics("AI-101").await;
        assert_eq!(report.entries, 5);
        assert!(report.price_range.min <= report.price_range.max);
        assert!(report.volatility >= 0.0);

        let empty = svc.analytics("UNKNOWN").await;
        assert_eq!(empty.entries, 0);
        assert_eq!(empty.peak_hours.hour, 12);
    }

    #[tokio::test]
    async fn test_oversized_fares_rejected_before_analytics() {
        let svc = service();
        for _ in 0..8 {
            let mut req = request("BIG", Utc::now());
            req.base_fare = dec!(15000000000000000000000000000);
            assert!(matches!(
                svc.compute_price(&req).await,
                Err(PricingError::InvalidInput(_))
            ));
        }

        let report = svc.analytics("BIG").await;
        assert_eq!(report.entries, 0);
    }

    #[tokio::test]
    async fn test_refresh_ignores_expired_history() {
        // 0.99 misses the refresh gate and never spikes
        let svc = FareService::with_random(
            &Config::default(),
            Box::new(ScriptedRandom::constant(0.99)),
            Box::new(StdRandom::seeded(1)),
        );
        let then = Utc::now() - Duration::days(29);
        for _ in 0..10 {
            let mut req = request("AI-101", then);
            req.base_fare = dec!(9000);
            svc.compute_price_at(&req, then).await.unwrap();
        }

        let before = svc.demand_snapshot("AI-101").await.unwrap();
        let summary = svc.refresh_demand_at(then + Duration::days(31)).await;
        assert_eq!(summary.adjusted, 0);
        assert_eq!(svc.demand_snapshot("AI-101").await.unwrap(), before);

        let summary = svc.refresh_demand_at(then + Duration::hours(1)).await;
        assert_eq!(summary.adjusted, 1);
    }

    #[tokio::test]
    async fn test_events_use_config_override() {
        let toml = r#"
            [[events]]
            id = "expo"
            category = "business"
            name = "Trade Expo"
            impact = 1.2
            start_date = "2026-11-01"
            end_date = "2026-11-03"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        let svc = FareService::new(&config);

        assert_eq!(svc.list_events().len(), 1);
        let day = NaiveDate::from_ymd_opt(2026, 11, 3).unwrap();
        assert_eq!(svc.active_events(day)[0].id, "expo");
        assert!(svc.active_events(day.succ_opt().unwrap()).is_empty());

        assert_eq!(service().list_events().len(), EventCatalog::builtin().len());
    }

    #[test]
    fn test_status_blocking() {
        let svc = service();
        let status = tokio_test::block_on(svc.status());
        assert_eq!(status.tracked_flights, 0);
        assert_eq!(status.catalog_events, EventCatalog::builtin().len());
    }

    #[tokio::test]
    async fn test_concurrent_pricing_keeps_every_entry() {
        let svc = service();
        let mut handles = Vec::new();
        for _ in 0..20 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.compute_price(&request("AI-101", Utc::now())).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(svc.price_history("AI-101", 30).await.len(), 20);
    }
}
