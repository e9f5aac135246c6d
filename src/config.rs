//! Configuration types for fare-engine

use crate::events::EventRecord;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub demand: DemandConfig,
    #[serde(default)]
    pub fraud: FraudConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Event catalog override; the built-in catalog is used when empty
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// Price computation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Lowest allowed price as a fraction of base fare
    #[serde(default = "default_price_floor_ratio")]
    pub price_floor_ratio: Decimal,

    /// Highest allowed price as a fraction of base fare
    #[serde(default = "default_price_ceiling_ratio")]
    pub price_ceiling_ratio: Decimal,

    /// Probability that a matching event applies to a given request
    #[serde(default = "default_event_probability")]
    pub event_probability: f64,

    /// Search attempts above which the frequent-search premium applies
    #[serde(default = "default_frequent_search_threshold")]
    pub frequent_search_threshold: u32,

    /// Price history retention window (days)
    #[serde(default = "default_history_retention_days")]
    pub history_retention_days: i64,
}

fn default_price_floor_ratio() -> Decimal {
    Decimal::new(7, 1) // 0.7
}
fn default_price_ceiling_ratio() -> Decimal {
    Decimal::new(3, 0) // 3.0
}
fn default_event_probability() -> f64 {
    0.3
}
fn default_frequent_search_threshold() -> u32 {
    20
}
fn default_history_retention_days() -> i64 {
    30
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_floor_ratio: Decimal::new(7, 1),
            price_ceiling_ratio: Decimal::new(3, 0),
            event_probability: 0.3,
            frequent_search_threshold: 20,
            history_retention_days: 30,
        }
    }
}

/// Demand simulation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DemandConfig {
    /// Interval between background demand refreshes (seconds)
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Per-flight probability of a level reassignment on refresh
    #[serde(default = "default_refresh_probability")]
    pub refresh_probability: f64,

    /// Number of recent prices needed before spike probability is adjusted
    #[serde(default = "default_learning_window")]
    pub learning_window: usize,

    /// Mean price above which spike probability decays
    #[serde(default = "default_high_price_threshold")]
    pub high_price_threshold: Decimal,

    /// Mean price below which spike probability grows
    #[serde(default = "default_low_price_threshold")]
    pub low_price_threshold: Decimal,
}

fn default_refresh_interval_secs() -> u64 {
    60
}
fn default_refresh_probability() -> f64 {
    0.3
}
fn default_learning_window() -> usize {
    10
}
fn default_high_price_threshold() -> Decimal {
    Decimal::new(5000, 0)
}
fn default_low_price_threshold() -> Decimal {
    Decimal::new(4000, 0)
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60,
            refresh_probability: 0.3,
            learning_window: 10,
            high_price_threshold: Decimal::new(5000, 0),
            low_price_threshold: Decimal::new(4000, 0),
        }
    }
}

/// Fraud heuristic configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FraudConfig {
    /// Search attempts above which a request is flagged
    #[serde(default = "default_search_threshold")]
    pub search_threshold: u32,
}

fn default_search_threshold() -> u32 {
    50
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            search_threshold: 50,
        }
    }
}

/// Demand forecast configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Number of daily predictions per forecast
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,

    /// Reference fare used for recommended prices
    #[serde(default = "default_reference_fare")]
    pub reference_fare: Decimal,
}

fn default_horizon_days() -> u32 {
    30
}
fn default_reference_fare() -> Decimal {
    Decimal::new(4500, 0)
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            reference_fare: Decimal::new(4500, 0),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; exporter disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
