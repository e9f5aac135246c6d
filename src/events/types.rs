//! Event types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of external event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Festival,
    Weather,
    Business,
    Market,
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventCategory::Festival => "festival",
            EventCategory::Weather => "weather",
            EventCategory::Business => "business",
            EventCategory::Market => "market",
        };
        f.write_str(name)
    }
}

/// An external event with a price impact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Catalog key
    pub id: String,
    pub category: EventCategory,
    /// Display name
    pub name: String,
    /// Price multiplier applied when the event is relevant (typically > 1)
    pub impact: Decimal,
    /// First day of the event window (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the event window (inclusive)
    pub end_date: NaiveDate,
    /// Airports or cities affected
    #[serde(default)]
    pub locations: Vec<String>,
}

impl EventRecord {
    /// Check whether `date` falls inside the event window
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
