//! Price history module
//!
//! Rolling per-flight ledger of computed prices with time-based retention.

mod ledger;
mod types;

pub use ledger::PriceLedger;
pub use types::PriceHistoryEntry;
