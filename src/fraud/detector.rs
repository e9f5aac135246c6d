//! Fraud detection

use super::{AlertReason, FraudAlert, FraudCheck};
use crate::config::FraudConfig;
use crate::telemetry::CounterMetric;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Requester id used when a request carries none
pub const ANONYMOUS_USER: &str = "anonymous";

/// Heuristic fraud detector owning the global alert log
#[derive(Debug, Clone)]
pub struct FraudDetector {
    search_threshold: u32,
    /// Every alert ever raised, oldest first
    log: Vec<FraudAlert>,
}

impl FraudDetector {
    pub fn new(config: &FraudConfig) -> Self {
        Self {
            search_threshold: config.search_threshold,
            log: Vec::new(),
        }
    }

    /// Evaluate a request and log an alert if any rule fires.
    ///
    /// Identical requests keep adding log entries; the log is an audit trail.
    /// Pricing splits this into [`Self::evaluate`] and [`Self::record`] so a
    /// failed price call leaves the log unchanged.
    #[cfg(test)]
    pub fn detect(
        &mut self,
        flight_id: &str,
        user_id: Option<&str>,
        search_count: u32,
        now: DateTime<Utc>,
    ) -> FraudCheck {
        let check = self.evaluate(flight_id, user_id, search_count);
        self.record(flight_id, user_id, &check, now);
        check
    }

    /// Apply the rules without touching the log
    pub fn evaluate(
        &self,
        flight_id: &str,
        user_id: Option<&str>,
        search_count: u32,
    ) -> FraudCheck {
        let user_id = user_id.unwrap_or(ANONYMOUS_USER);
        let mut alerts = Vec::new();

        if search_count > self.search_threshold {
            alerts.push(AlertReason::HighSearchFrequency);
        }

        if self.has_alert(flight_id, user_id) {
            alerts.push(AlertReason::RepeatedSuspiciousActivity);
        }

        FraudCheck { alerts }
    }

    /// Append an alert for a flagged check; clean checks are ignored
    pub fn record(
        &mut self,
        flight_id: &str,
        user_id: Option<&str>,
        check: &FraudCheck,
        now: DateTime<Utc>,
    ) {
        if !check.is_flagged() {
            return;
        }

        let user_id = user_id.unwrap_or(ANONYMOUS_USER);
        tracing::warn!(
            flight_id,
            user_id,
            severity = check.severity(),
            reasons = ?check.alerts,
            "Fraud alert raised"
        );
        crate::telemetry::increment(CounterMetric::FraudAlerts);
        self.log.push(FraudAlert {
            id: Uuid::new_v4(),
            flight_id: flight_id.to_string(),
            user_id: user_id.to_string(),
            reasons: check.alerts.clone(),
            timestamp: now,
        });
    }

    /// True if `user_id` already has an alert on `flight_id`
    fn has_alert(&self, flight_id: &str, user_id: &str) -> bool {
        self.log
            .iter()
            .any(|a| a.flight_id == flight_id && a.user_id == user_id)
    }

    /// The most recent `limit` alerts, oldest first
    pub fn recent_alerts(&self, limit: usize) -> Vec<FraudAlert> {
        let skip = self.log.len().saturating_sub(limit);
        self.log[skip..].to_vec()
    }

    pub fn alert_count(&self) -> usize {
        self.log.len()
    }
}

impl Default for FraudDetector {
    fn default() -> Self {
        Self::new(&FraudConfig::default())
    }
}
