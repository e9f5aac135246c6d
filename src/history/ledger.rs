//! Per-flight price ledger

use super::PriceHistoryEntry;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};

/// Chronological price history per flight, trimmed to a retention window
#[derive(Debug, Clone)]
pub struct PriceLedger {
    /// Entries older than this are dropped
    retention: Duration,
    /// History by flight, oldest first
    entries: HashMap<String, VecDeque<PriceHistoryEntry>>,
}

impl PriceLedger {
    /// Create a ledger that keeps `retention_days` of history
    pub fn new(retention_days: i64) -> Self {
        Self {
            retention: Duration::try_days(retention_days).unwrap_or(Duration::MAX),
            entries: HashMap::new(),
        }
    }

    /// Record a price and drop everything older than the retention window
    pub fn append(&mut self, flight_id: &str, entry: PriceHistoryEntry, now: DateTime<Utc>) {
        let history = self.entries.entry(flight_id.to_string()).or_default();
        history.push_back(entry);

        if let Some(cutoff) = now.checked_sub_signed(self.retention) {
            history.retain(|e| e.timestamp >= cutoff);
        }
    }

    /// Entries from the last `days` days, oldest first.
    ///
    /// The window never reaches past the retention period, so entries that
    /// expired since the last append are not returned either.
    pub fn query(&self, flight_id: &str, days: i64, now: DateTime<Utc>) -> Vec<PriceHistoryEntry> {
        let window = if days > 0 {
            Duration::try_days(days)
                .unwrap_or(self.retention)
                .min(self.retention)
        } else {
            Duration::zero()
        };
        let cutoff = now.checked_sub_signed(window);
        self.entries
            .get(flight_id)
            .map(|history| {
                history
                    .iter()
                    .filter(|e| is_after(e, cutoff))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The most recent `count` unexpired entries, oldest first
    pub fn recent(
        &self,
        flight_id: &str,
        count: usize,
        now: DateTime<Utc>,
    ) -> Vec<&PriceHistoryEntry> {
        let cutoff = now.checked_sub_signed(self.retention);
        self.entries
            .get(flight_id)
            .map(|history| {
                let live: Vec<_> = history.iter().filter(|e| is_after(e, cutoff)).collect();
                let skip = live.len().saturating_sub(count);
                live.into_iter().skip(skip).collect()
            })
            .unwrap_or_default()
    }

    /// Number of flights with at least one recorded price
    pub fn flight_count(&self) -> usize {
        self.entries.values().filter(|h| !h.is_empty()).count()
    }

    /// Entries across all flights
    pub fn total_entries(&self) -> usize {
        self.entries.values().map(VecDeque::len).sum()
    }
}

/// A cutoff before the earliest representable time keeps everything
fn is_after(entry: &PriceHistoryEntry, cutoff: Option<DateTime<Utc>>) -> bool {
    cutoff.map_or(true, |c| entry.timestamp > c)
}

impl Default for PriceLedger {
    fn default() -> Self {
        Self::new(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn entry(ts: DateTime<Utc>, price: Decimal) -> PriceHistoryEntry {
        PriceHistoryEntry::new(ts, price, dec!(1.0), vec![])
    }

    #[test]
    fn test_append_and_query_in_order() {
        let mut ledger = PriceLedger::new(30);
        let now = Utc::now();

        ledger.append("AI-101", entry(now - Duration::hours(2), dec!(100)), now);
        ledger.append("AI-101", entry(now - Duration::hours(1), dec!(110)), now);
        ledger.append("AI-101", entry(now, dec!(120)), now);

        let history = ledger.query("AI-101", 30, now);
        let prices: Vec<_> = history.iter().map(|e| e.price).collect();
        assert_eq!(prices, vec![dec!(100), dec!(110), dec!(120)]);
    }

    #[test]
    fn test_unknown_flight_is_empty() {
        let ledger = PriceLedger::new(30);
        assert!(ledger.query("nope", 30, Utc::now()).is_empty());
        assert!(ledger.recent("nope", 10, Utc::now()).is_empty());
    }

    #[test]
    fn test_append_trims_expired() {
        let mut ledger = PriceLedger::new(30);
        let now = Utc::now();

        ledger.append("AI-101", entry(now - Duration::days(45), dec!(90)), now);
        ledger.append("AI-101", entry(now - Duration::days(31), dec!(95)), now);
        ledger.append("AI-101", entry(now, dec!(100)), now);

        assert_eq!(ledger.total_entries(), 1);
        assert_eq!(ledger.query("AI-101", 30, now)[0].price, dec!(100));
    }

    #[test]
    fn test_query_never_exceeds_retention() {
        let mut ledger = PriceLedger::new(30);
        let then = Utc::now() - Duration::days(20);
        ledger.append("AI-101", entry(then, dec!(100)), then);

        // 15 days later the entry is 35 days old without any new append
        let later = then + Duration::days(35);
        assert!(ledger.query("AI-101", 90, later).is_empty());
    }

    #[test]
    fn test_query_window() {
        let mut ledger = PriceLedger::new(30);
        let now = Utc::now();
        ledger.append("AI-101", entry(now - Duration::days(10), dec!(100)), now);
        ledger.append("AI-101", entry(now - Duration::days(2), dec!(110)), now);

        assert_eq!(ledger.query("AI-101", 7, now).len(), 1);
        assert_eq!(ledger.query("AI-101", 30, now).len(), 2);
    }

    #[test]
    fn test_query_is_repeatable() {
        let mut ledger = PriceLedger::new(30);
        let now = Utc::now();
        ledger.append("AI-101", entry(now, dec!(100)), now);

        assert_eq!(ledger.query("AI-101", 30, now), ledger.query("AI-101", 30, now));
    }

    #[test]
    fn test_recent() {
        let mut ledger = PriceLedger::new(30);
        let now = Utc::now();
        for i in 0..5 {
            ledger.append("AI-101", entry(now, Decimal::from(i)), now);
        }

        let recent: Vec<_> = ledger
            .recent("AI-101", 3, now)
            .iter()
            .map(|e| e.price)
            .collect();
        assert_eq!(recent, vec![dec!(2), dec!(3), dec!(4)]);
        assert_eq!(ledger.recent("AI-101", 10, now).len(), 5);
    }

    #[test]
    fn test_recent_skips_expired() {
        let mut ledger = PriceLedger::new(30);
        let then = Utc::now() - Duration::days(40);
        ledger.append("AI-101", entry(then, dec!(100)), then);
        ledger.append("AI-101", entry(then + Duration::days(5), dec!(110)), then);

        // No append since, so both entries are still stored
        assert_eq!(ledger.total_entries(), 2);
        let now = then + Duration::days(32);
        let recent: Vec<_> = ledger
            .recent("AI-101", 10, now)
            .iter()
            .map(|e| e.price)
            .collect();
        assert_eq!(recent, vec![dec!(110)]);
        assert!(ledger.recent("AI-101", 10, now + Duration::days(10)).is_empty());
    }

    #[test]
    fn test_query_with_huge_day_count() {
        let mut ledger = PriceLedger::new(30);
        let now = Utc::now();
        let then = now - Duration::days(40);
        ledger.append("AI-101", entry(then, dec!(90)), then);
        ledger.append("AI-101", entry(now, dec!(100)), now);

        let history = ledger.query("AI-101", i64::MAX, now);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, dec!(100));
        assert!(ledger.query("AI-101", i64::MIN, now).is_empty());
    }

    #[test]
    fn test_huge_retention_keeps_everything() {
        let mut ledger = PriceLedger::new(i64::MAX);
        let now = Utc::now();
        ledger.append("AI-101", entry(now - Duration::days(4000), dec!(90)), now);
        ledger.append("AI-101", entry(now, dec!(100)), now);

        assert_eq!(ledger.total_entries(), 2);
        assert_eq!(ledger.query("AI-101", 365_000, now).len(), 2);
        assert_eq!(ledger.recent("AI-101", 10, now).len(), 2);
    }

    #[test]
    fn test_counts() {
        let mut ledger = PriceLedger::new(30);
        let now = Utc::now();
        ledger.append("AI-101", entry(now, dec!(1)), now);
        ledger.append("AI-101", entry(now, dec!(2)), now);
        ledger.append("UK-955", entry(now, dec!(3)), now);

        assert_eq!(ledger.flight_count(), 2);
        assert_eq!(ledger.total_entries(), 3);
    }
}
