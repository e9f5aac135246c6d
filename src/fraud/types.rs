//! Fraud types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Why a request was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertReason {
    /// Search attempts above the configured threshold
    HighSearchFrequency,
    /// Requester already flagged on this flight
    RepeatedSuspiciousActivity,
}

impl fmt::Display for AlertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertReason::HighSearchFrequency => f.write_str("high search frequency"),
            AlertReason::RepeatedSuspiciousActivity => f.write_str("repeated suspicious activity"),
        }
    }
}

/// A logged fraud alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudAlert {
    pub id: Uuid,
    pub flight_id: String,
    pub user_id: String,
    pub reasons: Vec<AlertReason>,
    pub timestamp: DateTime<Utc>,
}

/// Result of checking one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudCheck {
    pub alerts: Vec<AlertReason>,
}

impl FraudCheck {
    /// Number of rules triggered
    pub fn severity(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_flagged(&self) -> bool {
        !self.alerts.is_empty()
    }
}
