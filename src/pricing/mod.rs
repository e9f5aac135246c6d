//! Pricing engine module
//!
//! Computes a fare as the product of six banded factors, clamps it to the
//! configured band around the base fare and explains the result.

mod engine;
pub mod factors;
mod types;
mod whatif;

pub use engine::{MarketState, PricingEngine};
pub use types::{FactorKind, FlightPricingRequest, PriceExplanation, PricingError, PricingFactor};
pub use whatif::{ReferenceFlight, ScenarioKind, WhatIfResult};
