//! Event catalog module
//!
//! Time-bounded external events (festivals, weather, conferences) that can
//! raise fares for departures inside their window.

mod catalog;
mod types;

pub use catalog::EventCatalog;
pub use types::{EventCategory, EventRecord};
