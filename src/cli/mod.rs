//! CLI interface for fare-engine
//!
//! Provides subcommands for:
//! - `quote`: Price a single request
//! - `what-if`: Run a hypothetical pricing scenario
//! - `simulate`: Replay synthetic traffic and report analytics
//! - `serve`: Run the demand refresh loop against live synthetic traffic
//! - `events`: List the event catalog
//! - `config`: Show configuration

mod events;
mod quote;
mod serve;
mod simulate;
mod traffic;
mod whatif;

pub use events::EventsArgs;
pub use quote::QuoteArgs;
pub use serve::ServeArgs;
pub use simulate::SimulateArgs;
pub use traffic::TrafficGenerator;
pub use whatif::WhatIfArgs;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "fare-engine")]
#[command(about = "Dynamic flight fare pricing and demand simulation engine")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price a single request
    Quote(QuoteArgs),
    /// Run a hypothetical pricing scenario
    WhatIf(WhatIfArgs),
    /// Replay synthetic traffic and report analytics
    Simulate(SimulateArgs),
    /// Run the demand refresh loop until Ctrl-C
    Serve(ServeArgs),
    /// List catalog events
    Events(EventsArgs),
    /// Show configuration
    Config,
}

/// Report output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
