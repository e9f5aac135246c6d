//! Per-flight demand store

use super::{DemandLevel, DemandRecord, DemandTrend};
use crate::config::DemandConfig;
use crate::history::PriceLedger;
use crate::random::{choose, stable_hash, RandomSource};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Spike probability decay after sustained high prices
const SPIKE_DECAY: f64 = 0.95;
/// Spike probability growth after sustained low prices
const SPIKE_GROWTH: f64 = 1.05;
/// Weight of the flight-specific signal in the spike draw
const SIGNAL_WEIGHT: f64 = 0.2;

/// Flight-specific spike signal in `[0, 1)`.
///
/// Scales a hash-derived affinity by how full the flight is, so scarce
/// flights are more likely to spike than empty ones.
pub fn flight_signal(flight_id: &str, available_ratio: f64) -> f64 {
    let affinity = (stable_hash(flight_id) % 100) as f64 / 100.0;
    affinity * (1.0 - available_ratio.clamp(0.0, 1.0))
}

impl DemandRecord {
    /// Initial state for a flight seen for the first time.
    ///
    /// Level and spike probability depend only on the identifier; the booking
    /// count mixes in one random draw.
    pub fn seed(flight_id: &str, rng: &mut dyn RandomSource) -> Self {
        let hash = stable_hash(flight_id);
        let level = DemandLevel::INITIAL[(hash % 3) as usize];
        let booking_count = u64::from(rng.range_inclusive(0, 20)) + hash % 30;
        let spike_probability = 0.1 + (hash % 50) as f64 / 100.0;

        Self {
            level,
            booking_count,
            spike_probability,
            trend: DemandTrend::Stable,
        }
    }

    /// State after a price call. Returns the next record and whether a spike fired.
    ///
    /// A failed spike draw leaves the level untouched.
    pub fn after_price_call(&self, signal: f64, rng: &mut dyn RandomSource) -> (Self, bool) {
        let threshold = (self.spike_probability + signal * SIGNAL_WEIGHT).min(1.0);
        if !rng.chance(threshold) {
            return (self.clone(), false);
        }

        let level = choose(rng, &DemandLevel::SPIKE);
        let bookings = u64::from(rng.range_inclusive(5, 15));
        let next = Self {
            level,
            booking_count: self.booking_count + bookings,
            spike_probability: self.spike_probability,
            trend: DemandTrend::Increasing,
        };
        (next, true)
    }
}

/// Outcome of one background refresh pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Flights visited
    pub flights: usize,
    /// Flights whose level was reassigned
    pub reassigned: usize,
    /// Flights whose spike probability was adjusted from price history
    pub adjusted: usize,
}

/// Demand records keyed by flight identifier
#[derive(Debug, Clone, Default)]
pub struct DemandStore {
    records: BTreeMap<String, DemandRecord>,
}

impl DemandStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, flight_id: &str) -> Option<&DemandRecord> {
        self.records.get(flight_id)
    }

    /// Existing record, or a freshly seeded one for an unseen flight.
    ///
    /// Nothing is inserted; callers store the record with [`Self::insert`]
    /// once the price call that created it succeeds.
    pub fn get_or_seed(&self, flight_id: &str, rng: &mut dyn RandomSource) -> DemandRecord {
        match self.records.get(flight_id) {
            Some(record) => record.clone(),
            None => DemandRecord::seed(flight_id, rng),
        }
    }

    /// Replace the record for `flight_id`
    pub fn insert(&mut self, flight_id: &str, record: DemandRecord) {
        self.records.insert(flight_id.to_string(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Background demand drift plus price-learning feedback.
    ///
    /// Every known flight may have its level reassigned; flights with a full
    /// learning window of unexpired prices get their spike probability nudged
    /// down after sustained high prices and up after sustained low prices.
    pub fn refresh(
        &mut self,
        ledger: &PriceLedger,
        config: &DemandConfig,
        rng: &mut dyn RandomSource,
        now: DateTime<Utc>,
    ) -> RefreshSummary {
        let mut summary = RefreshSummary::default();

        for (flight_id, record) in self.records.iter_mut() {
            summary.flights += 1;

            if rng.chance(config.refresh_probability) {
                let level = choose(rng, &DemandLevel::ALL);
                record.trend = DemandTrend::between(record.level, level);
                record.level = level;
                record.booking_count += u64::from(rng.range_inclusive(1, 8));
                summary.reassigned += 1;
            }

            if config.learning_window == 0 {
                continue;
            }
            let recent = ledger.recent(flight_id, config.learning_window, now);
            if recent.len() < config.learning_window {
                continue;
            }

            let Some(mean) = mean_price(recent.iter().map(|e| e.price)) else {
                tracing::warn!(flight_id, "Recent price mean overflowed, skipping feedback");
                continue;
            };
            let factor = if mean > config.high_price_threshold {
                SPIKE_DECAY
            } else if mean < config.low_price_threshold {
                SPIKE_GROWTH
            } else {
                continue;
            };
            record.spike_probability = (record.spike_probability * factor).clamp(0.0, 1.0);
            summary.adjusted += 1;
        }

        summary
    }
}

/// Mean of `prices`, or `None` when empty or the running sum overflows
fn mean_price(mut prices: impl ExactSizeIterator<Item = Decimal>) -> Option<Decimal> {
    let count = Decimal::from(prices.len());
    let total = prices.try_fold(Decimal::ZERO, Decimal::checked_add)?;
    total.checked_div(count)
}
