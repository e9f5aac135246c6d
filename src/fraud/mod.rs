//! Fraud heuristic module
//!
//! Threshold rules over request behavior with an append-only alert log.

mod detector;
mod types;

pub use detector::FraudDetector;
pub use types::{AlertReason, FraudAlert, FraudCheck};
