//! Configuration loading tests

use fare_engine::config::{Config, LogFormat};
use fare_engine::FareService;
use rust_decimal_macros::dec;

#[test]
fn test_config_example_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();

    assert_eq!(config.pricing.price_floor_ratio, dec!(0.7));
    assert_eq!(config.pricing.price_ceiling_ratio, dec!(3.0));
    assert_eq!(config.demand.refresh_interval_secs, 60);
    assert_eq!(config.forecast.reference_fare, dec!(4500));
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    assert!(config.events.is_empty());
}

#[tokio::test]
async fn test_tighter_band_from_config() {
    let toml = r#"
        [pricing]
        price_floor_ratio = 0.9
        price_ceiling_ratio = 1.1
    "#;
    let config: Config = toml::from_str(toml).unwrap();
    let service = FareService::new(&config);

    for request in crate::pricing_flow_test::sample_requests() {
        let quote = service.compute_price(&request).await.unwrap();
        assert!(quote.price >= request.base_fare * dec!(0.9));
        assert!(quote.price <= request.base_fare * dec!(1.1));
    }
}
