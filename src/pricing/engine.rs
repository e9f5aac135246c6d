//! Price computation engine

use super::factors::{
    behavior_factor, demand_factor, event_factor, fraud_factor, hours_between, parse_departure,
    seat_factor, seat_jitter, time_factor,
};
use super::{FlightPricingRequest, PriceExplanation, PricingError, PricingFactor};
use crate::config::{Config, DemandConfig, PricingConfig};
use crate::demand::{flight_signal, DemandRecord, DemandStore, RefreshSummary};
use crate::events::EventCatalog;
use crate::fraud::FraudDetector;
use crate::history::{PriceHistoryEntry, PriceLedger};
use crate::random::RandomSource;
use crate::telemetry::{record_price, CounterMetric};
use chrono::{DateTime, Local, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Largest accepted base fare
pub const MAX_BASE_FARE: Decimal = dec!(1000000000);

/// Mutable state shared by pricing calls and the demand refresh
pub struct MarketState {
    pub demand: DemandStore,
    pub ledger: PriceLedger,
    pub fraud: FraudDetector,
    rng: Box<dyn RandomSource>,
}

impl MarketState {
    pub fn new(config: &Config, rng: Box<dyn RandomSource>) -> Self {
        Self {
            demand: DemandStore::new(),
            ledger: PriceLedger::new(config.pricing.history_retention_days),
            fraud: FraudDetector::new(&config.fraud),
            rng,
        }
    }

    /// Throwaway state holding a single demand record, used for hypotheticals
    pub fn scratch(
        flight_id: &str,
        demand: Option<DemandRecord>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let mut store = DemandStore::new();
        if let Some(record) = demand {
            store.insert(flight_id, record);
        }
        Self {
            demand: store,
            ledger: PriceLedger::default(),
            fraud: FraudDetector::default(),
            rng,
        }
    }

    pub fn rng(&mut self) -> &mut dyn RandomSource {
        self.rng.as_mut()
    }

    /// Run one background demand refresh against this state's ledger
    pub fn refresh_demand(&mut self, config: &DemandConfig, now: DateTime<Utc>) -> RefreshSummary {
        self.demand.refresh(&self.ledger, config, self.rng.as_mut(), now)
    }
}

/// Multiplicative fare pricing over seats, time, demand, behavior, events and fraud
pub struct PricingEngine {
    config: PricingConfig,
    events: Arc<EventCatalog>,
}

impl PricingEngine {
    pub fn new(config: PricingConfig, events: Arc<EventCatalog>) -> Self {
        Self { config, events }
    }

    pub fn events(&self) -> &EventCatalog {
        &self.events
    }

    /// Price one request and commit the result to `state`.
    ///
    /// All factors are computed before anything is written; a failure leaves
    /// `state` untouched apart from consumed random draws. On success the
    /// demand record, fraud log and ledger are updated in that order.
    pub fn compute(
        &self,
        state: &mut MarketState,
        request: &FlightPricingRequest,
        now: DateTime<Utc>,
    ) -> Result<PriceExplanation, PricingError> {
        validate(request)?;
        let base_fare = request.base_fare;
        let flight_id = request.flight_id.as_str();

        let departure = parse_departure(&request.departure_time)?;
        let hours = hours_between(now.with_timezone(&Local).naive_local(), departure);

        let available_ratio = f64::from(request.available_seats) / f64::from(request.total_seats);
        let seat_percentage = available_ratio * 100.0;
        let jittered = seat_percentage * (1.0 + seat_jitter(flight_id));

        let current = state.demand.get_or_seed(flight_id, state.rng.as_mut());
        let signal = flight_signal(flight_id, available_ratio);
        let (demand, spiked) = current.after_price_call(signal, state.rng());

        let event = match self.events.find_covering(departure.date()) {
            Some(event) if state.rng().chance(self.config.event_probability) => Some(event),
            _ => None,
        };

        let fraud = state
            .fraud
            .evaluate(flight_id, request.user_id.as_deref(), request.search_count);

        let factors = vec![
            seat_factor(jittered, base_fare),
            time_factor(hours, base_fare),
            demand_factor(demand.level, base_fare),
            behavior_factor(
                request.is_group_booking,
                request.search_count,
                self.config.frequent_search_threshold,
                base_fare,
            ),
            event_factor(event, base_fare),
            fraud_factor(&fraud, base_fare),
        ];

        let (price, multiplier) = self.final_price(base_fare, &factors)?;

        // Commit
        state.demand.insert(flight_id, demand.clone());
        state
            .fraud
            .record(flight_id, request.user_id.as_deref(), &fraud, now);
        state.ledger.append(
            flight_id,
            PriceHistoryEntry::new(now, price, multiplier, factors.clone()),
            now,
        );

        record_price(multiplier);
        if spiked {
            crate::telemetry::increment(CounterMetric::DemandSpikes);
        }
        tracing::info!(
            flight_id,
            %price,
            %multiplier,
            demand = %demand.level,
            spiked,
            fraud = fraud.is_flagged(),
            "Price computed"
        );
        for factor in &factors {
            tracing::debug!(
                flight_id,
                kind = ?factor.kind,
                multiplier = %factor.multiplier,
                reason = %factor.reason,
                "Pricing factor"
            );
        }

        Ok(PriceExplanation {
            flight_id: request.flight_id.clone(),
            price,
            multiplier,
            base_fare,
            total_seats: request.total_seats,
            available_seats: request.available_seats,
            seat_percentage: round2(seat_percentage),
            hours_until_departure: round2(hours),
            demand_level: demand.level,
            booking_count: demand.booking_count,
            factors: factors.into_iter().filter(PricingFactor::is_material).collect(),
            fraud_detected: fraud.is_flagged(),
            forecast: None,
            computed_at: now,
        })
    }

    /// Product of all factors applied to the fare, clamped and rounded.
    ///
    /// Returns `(price, price / base_fare)`.
    fn final_price(
        &self,
        base_fare: Decimal,
        factors: &[PricingFactor],
    ) -> Result<(Decimal, Decimal), PricingError> {
        let overflow = || PricingError::Internal("price computation overflowed".to_string());

        let product = factors
            .iter()
            .try_fold(Decimal::ONE, |acc, f| acc.checked_mul(f.multiplier))
            .ok_or_else(overflow)?;
        let raw = base_fare.checked_mul(product).ok_or_else(overflow)?;

        let floor = base_fare
            .checked_mul(self.config.price_floor_ratio)
            .ok_or_else(overflow)?;
        let ceiling = base_fare
            .checked_mul(self.config.price_ceiling_ratio)
            .ok_or_else(overflow)?;
        // Round the bounds inward so the rounded price never escapes them
        let floor = floor.round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity);
        let ceiling = ceiling.round_dp_with_strategy(2, RoundingStrategy::ToNegativeInfinity);
        if floor > ceiling {
            return Err(PricingError::Internal(format!(
                "price floor {floor} above ceiling {ceiling}"
            )));
        }

        let price = raw.round_dp(2).clamp(floor, ceiling);
        let multiplier = price
            .checked_div(base_fare)
            .ok_or_else(overflow)?
            .round_dp(2);
        Ok((price, multiplier))
    }
}

fn validate(request: &FlightPricingRequest) -> Result<(), PricingError> {
    if request.flight_id.trim().is_empty() {
        return Err(PricingError::InvalidInput("flight id must not be empty".to_string()));
    }
    if request.base_fare <= Decimal::ZERO {
        return Err(PricingError::InvalidInput(format!(
            "base fare must be positive, got {}",
            request.base_fare
        )));
    }
    if request.base_fare > MAX_BASE_FARE {
        return Err(PricingError::InvalidInput(format!(
            "base fare {} exceeds the maximum of {MAX_BASE_FARE}",
            request.base_fare
        )));
    }
    if request.total_seats == 0 {
        return Err(PricingError::InvalidInput(
            "total seats must be positive".to_string(),
        ));
    }
    if request.available_seats > request.total_seats {
        return Err(PricingError::InvalidInput(format!(
            "available seats {} exceed capacity {}",
            request.available_seats, request.total_seats
        )));
    }
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
