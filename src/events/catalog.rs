//! Read-only event catalog

use super::{EventCategory, EventRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Catalog of known events, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    events: Vec<EventRecord>,
}

impl EventCatalog {
    /// Create a catalog from explicit records
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self { events }
    }

    /// Catalog with no events
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in catalog of seasonal events
    pub fn builtin() -> Self {
        let event = |id: &str,
                     category: EventCategory,
                     name: &str,
                     impact: Decimal,
                     start: (i32, u32, u32),
                     end: (i32, u32, u32),
                     locations: &[&str]| {
            // Dates are literals; an invalid one is skipped rather than panicking
            let start_date = NaiveDate::from_ymd_opt(start.0, start.1, start.2)?;
            let end_date = NaiveDate::from_ymd_opt(end.0, end.1, end.2)?;
            Some(EventRecord {
                id: id.to_string(),
                category,
                name: name.to_string(),
                impact,
                start_date,
                end_date,
                locations: locations.iter().map(|l| l.to_string()).collect(),
            })
        };

        let events = [
            event(
                "diwali-2026",
                EventCategory::Festival,
                "Diwali",
                Decimal::new(135, 2),
                (2026, 11, 5),
                (2026, 11, 12),
                &["DEL", "BOM", "BLR", "HYD", "CCU"],
            ),
            event(
                "year-end-holidays-2026",
                EventCategory::Festival,
                "Year-end holidays",
                Decimal::new(140, 2),
                (2026, 12, 20),
                (2027, 1, 5),
                &["DEL", "BOM", "GOI", "BLR", "MAA"],
            ),
            event(
                "winter-fog-2027",
                EventCategory::Weather,
                "North India winter fog",
                Decimal::new(125, 2),
                (2027, 1, 6),
                (2027, 1, 31),
                &["DEL", "LKO", "ATQ", "JAI"],
            ),
            event(
                "tech-summit-2027",
                EventCategory::Business,
                "Bengaluru Tech Summit",
                Decimal::new(120, 2),
                (2027, 2, 15),
                (2027, 2, 18),
                &["BLR"],
            ),
            event(
                "holi-2027",
                EventCategory::Festival,
                "Holi",
                Decimal::new(130, 2),
                (2027, 3, 20),
                (2027, 3, 24),
                &["DEL", "JAI", "LKO", "VNS"],
            ),
            event(
                "summer-travel-2027",
                EventCategory::Market,
                "Summer vacation travel peak",
                Decimal::new(115, 2),
                (2027, 5, 1),
                (2027, 6, 15),
                &["DEL", "BOM", "BLR", "IXB", "SXR"],
            ),
            event(
                "monsoon-2027",
                EventCategory::Weather,
                "Monsoon disruptions",
                Decimal::new(110, 2),
                (2027, 7, 1),
                (2027, 8, 31),
                &["BOM", "GOI", "COK"],
            ),
        ];

        Self::new(events.into_iter().flatten().collect())
    }

    /// All events, in catalog order
    pub fn all(&self) -> &[EventRecord] {
        &self.events
    }

    /// First event whose window contains `date`
    pub fn find_covering(&self, date: NaiveDate) -> Option<&EventRecord> {
        self.events.iter().find(|e| e.covers(date))
    }

    /// Every event whose window contains `date`
    pub fn active_on(&self, date: NaiveDate) -> Vec<&EventRecord> {
        self.events.iter().filter(|e| e.covers(date)).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
