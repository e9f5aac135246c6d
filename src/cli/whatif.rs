//! What-if command implementation

use crate::config::Config;
use crate::pricing::ScenarioKind;
use crate::service::FareService;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct WhatIfArgs {
    /// Scenario: fuel_increase, half_empty, competitor_price_drop, demand_spike, weather_delay
    #[arg(long)]
    pub scenario: String,

    /// Scenario magnitude in percent
    #[arg(long, default_value = "0")]
    pub value: Decimal,

    /// Flight identifier whose demand state seeds the run
    #[arg(long, default_value = "AI-101")]
    pub flight: String,
}

impl WhatIfArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let scenario: ScenarioKind = self.scenario.parse()?;
        let service = FareService::new(config);
        let result = service.what_if(scenario, self.value, &self.flight).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    }
}
