//! fare-engine: Dynamic flight fare pricing and demand simulation
//!
//! This library provides the core components for:
//! - Multiplicative fare pricing with a factor-by-factor explanation
//! - Simulated per-flight demand with spikes and background drift
//! - Heuristic fraud detection with an append-only alert log
//! - Time-bounded event catalog with price impact
//! - Rolling price history with retention trimming
//! - Synthetic demand forecasts and history analytics
//! - What-if scenario pricing
//! - Full observability stack

pub mod analytics;
pub mod cli;
pub mod config;
pub mod demand;
pub mod events;
pub mod forecast;
pub mod fraud;
pub mod history;
pub mod pricing;
pub mod random;
pub mod service;
pub mod telemetry;

pub use service::FareService;
