//! Events command implementation

use crate::config::Config;
use crate::service::FareService;
use chrono::NaiveDate;
use clap::Args;

#[derive(Args, Debug)]
pub struct EventsArgs {
    /// Only events active on this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl EventsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = FareService::new(config);
        let events = match self.date {
            Some(date) => service.active_events(date),
            None => service.list_events(),
        };

        if events.is_empty() {
            println!("No events");
        }
        for event in events {
            println!(
                "{:<24} {:<10} x{:<5} {} .. {}  {}",
                event.id,
                event.category.to_string(),
                event.impact,
                event.start_date,
                event.end_date,
                event.name
            );
        }
        Ok(())
    }
}
