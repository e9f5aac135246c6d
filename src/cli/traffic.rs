//! Synthetic pricing traffic

use crate::pricing::FlightPricingRequest;
use crate::random::{choose, stable_hash, RandomSource};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rust_decimal::Decimal;

const FLIGHT_IDS: [&str; 8] = [
    "AI-101", "6E-2134", "UK-955", "SG-8169", "QP-1302", "IX-344", "AI-865", "6E-577",
];

const TOTAL_SEATS: u32 = 180;

/// Random requests over a fixed set of flights
pub struct TrafficGenerator {
    flights: Vec<&'static str>,
    rng: Box<dyn RandomSource>,
}

impl TrafficGenerator {
    /// `flights` is capped at the number of known flight ids
    pub fn new(flights: usize, rng: Box<dyn RandomSource>) -> Self {
        let count = flights.clamp(1, FLIGHT_IDS.len());
        Self {
            flights: FLIGHT_IDS[..count].to_vec(),
            rng,
        }
    }

    pub fn flights(&self) -> &[&'static str] {
        &self.flights
    }

    /// Next request, departing 1 to 720 hours after `now`
    pub fn next_request(&mut self, now: DateTime<Utc>) -> FlightPricingRequest {
        let flight_id = choose(self.rng.as_mut(), &self.flights);
        let base_fare = Decimal::from(3000 + stable_hash(flight_id) % 5000);
        let hours = i64::from(self.rng.range_inclusive(1, 720));

        FlightPricingRequest {
            flight_id: flight_id.to_string(),
            base_fare,
            total_seats: TOTAL_SEATS,
            available_seats: self.rng.range_inclusive(0, TOTAL_SEATS),
            departure_time: (now + Duration::hours(hours))
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            user_id: Some(format!("user-{}", self.rng.range_inclusive(1, 20))),
            search_count: self.rng.range_inclusive(0, 60),
            is_group_booking: self.rng.chance(0.1),
        }
    }
}
