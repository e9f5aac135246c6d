//! Individual pricing factors
//!
//! Each function maps one input signal onto a banded multiplier with a
//! human-readable reason.

use super::{FactorKind, PricingError, PricingFactor};
use crate::demand::DemandLevel;
use crate::events::EventRecord;
use crate::fraud::FraudCheck;
use crate::random::stable_hash;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Accepted naive date-time layouts; `%.f` also matches no fraction
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a departure timestamp into naive local time.
///
/// Offset-aware inputs (including a trailing `Z`) are converted to the local
/// zone first; inputs without an offset are taken as local already.
pub fn parse_departure(raw: &str) -> Result<NaiveDateTime, PricingError> {
    let trimmed = raw.trim();
    let normalized = match trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };

    if let Ok(aware) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(aware.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(PricingError::InvalidInput(format!(
        "unparseable departure time: {raw:?}"
    )))
}

/// Hours from `now` to `departure`, both naive local
pub fn hours_between(now: NaiveDateTime, departure: NaiveDateTime) -> f64 {
    (departure - now).num_milliseconds() as f64 / 3_600_000.0
}

/// Deterministic seat-percentage jitter in `[-0.10, 0.10]` for a flight
pub fn seat_jitter(flight_id: &str) -> f64 {
    let bucket = (stable_hash(flight_id) >> 16) % 21;
    (bucket as f64 - 10.0) / 100.0
}

/// Seat availability factor from a (jittered) seat percentage
pub fn seat_factor(seat_percentage: f64, base_fare: Decimal) -> PricingFactor {
    let (multiplier, reason) = if seat_percentage > 80.0 {
        (dec!(0.85), "plenty of seats available")
    } else if seat_percentage > 50.0 {
        (dec!(0.95), "good seat availability")
    } else if seat_percentage > 20.0 {
        (dec!(1.2), "seats filling up")
    } else if seat_percentage > 5.0 {
        (dec!(1.4), "limited seats remaining")
    } else {
        (dec!(1.8), "nearly sold out")
    };
    PricingFactor::new(FactorKind::SeatAvailability, multiplier, base_fare, reason)
}

/// Time-to-departure factor
pub fn time_factor(hours: f64, base_fare: Decimal) -> PricingFactor {
    let (multiplier, reason) = if hours <= 0.0 {
        (dec!(0.5), "flight already departed")
    } else if hours <= 2.0 {
        (dec!(2.0), "last 2 hours")
    } else if hours <= 6.0 {
        (dec!(1.6), "departing within 6 hours")
    } else if hours <= 24.0 {
        (dec!(1.3), "departing within 24 hours")
    } else if hours <= 72.0 {
        (dec!(1.1), "departing within 3 days")
    } else if hours <= 168.0 {
        (dec!(1.0), "departing within a week")
    } else {
        (dec!(0.9), "early booking discount")
    };
    PricingFactor::new(FactorKind::TimeToDeparture, multiplier, base_fare, reason)
}

/// Demand factor for the level in effect after this call's transition
pub fn demand_factor(level: DemandLevel, base_fare: Decimal) -> PricingFactor {
    PricingFactor::new(
        FactorKind::Demand(level),
        level.multiplier(),
        base_fare,
        format!("{level} demand"),
    )
}

/// User behavior factor
pub fn behavior_factor(
    is_group_booking: bool,
    search_count: u32,
    frequent_search_threshold: u32,
    base_fare: Decimal,
) -> PricingFactor {
    let (multiplier, reason) = if is_group_booking {
        (dec!(1.15), "group booking (volume discount tier)")
    } else if search_count > frequent_search_threshold {
        (dec!(1.10), "frequent-search signal")
    } else {
        (dec!(1.0), "standard booking behavior")
    };
    PricingFactor::new(FactorKind::UserBehavior, multiplier, base_fare, reason)
}

/// Event factor; `None` when no event applies to this request
pub fn event_factor(event: Option<&EventRecord>, base_fare: Decimal) -> PricingFactor {
    match event {
        Some(event) => PricingFactor::new(
            FactorKind::EventImpact,
            event.impact,
            base_fare,
            format!("{} ({:?} event)", event.name, event.category).to_lowercase(),
        ),
        None => PricingFactor::new(
            FactorKind::EventImpact,
            Decimal::ONE,
            base_fare,
            "no event impact",
        ),
    }
}

/// Fraud discount factor
pub fn fraud_factor(check: &FraudCheck, base_fare: Decimal) -> PricingFactor {
    if check.is_flagged() {
        PricingFactor::new(
            FactorKind::FraudDiscount,
            dec!(0.95),
            base_fare,
            "suspicious activity: discourage abuse",
        )
    } else {
        PricingFactor::new(
            FactorKind::FraudDiscount,
            Decimal::ONE,
            base_fare,
            "no fraud signal",
        )
    }
}
