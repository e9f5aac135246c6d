//! What-if scenario tests

use fare_engine::pricing::{PricingError, ScenarioKind};
use fare_engine::FareService;
use fare_engine::config::Config;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_half_empty_reports_half_capacity() {
    let service = FareService::new(&Config::default());
    let result = service
        .what_if(ScenarioKind::HalfEmpty, dec!(0), "any-flight")
        .await
        .unwrap();

    let explanation = &result.explanation;
    assert_eq!(explanation.available_seats, explanation.total_seats / 2);
    assert_eq!(explanation.seat_percentage, 50.0);
    assert_eq!(result.change, result.new_price - result.original_price);
}

#[tokio::test]
async fn test_every_scenario_runs_without_side_effects() {
    let service = FareService::new(&Config::default());
    for kind in ScenarioKind::ALL {
        let result = service.what_if(kind, dec!(15), "AI-101").await.unwrap();
        assert_eq!(result.scenario, kind);
        assert!(!result.summary.is_empty());
    }

    let status = service.status().await;
    assert_eq!(status.tracked_flights, 0);
    assert_eq!(status.ledger_entries, 0);
    assert_eq!(status.fraud_alerts, 0);
}

#[test]
fn test_unknown_scenario_is_invalid_input() {
    assert!(matches!(
        "price_war".parse::<ScenarioKind>(),
        Err(PricingError::InvalidInput(_))
    ));
}
