//! End-to-end pricing flow tests

use chrono::{Duration, SecondsFormat, Utc};
use fare_engine::config::Config;
use fare_engine::demand::{DemandLevel, DemandTrend};
use fare_engine::pricing::{FactorKind, FlightPricingRequest, PricingError};
use fare_engine::random::StdRandom;
use fare_engine::FareService;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn departure_in(hours: i64) -> String {
    (Utc::now() + Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn sample_requests() -> Vec<FlightPricingRequest> {
    let shapes = [
        ("AI-101", dec!(5000), 180, 170, 400, 0, false),
        ("6E-2134", dec!(3200), 186, 90, 30, 5, false),
        ("UK-955", dec!(7800), 150, 12, 3, 25, false),
        ("SG-8169", dec!(4100), 189, 2, 1, 0, true),
        ("QP-1302", dec!(2500), 180, 60, -3, 70, false),
    ];
    shapes
        .into_iter()
        .map(|(id, fare, total, available, hours, searches, group)| FlightPricingRequest {
            flight_id: id.to_string(),
            base_fare: fare,
            total_seats: total,
            available_seats: available,
            departure_time: departure_in(hours),
            user_id: Some("traveler".to_string()),
            search_count: searches,
            is_group_booking: group,
        })
        .collect()
}

fn seeded_service(seed: u64) -> FareService {
    FareService::with_random(
        &Config::default(),
        Box::new(StdRandom::seeded(seed)),
        Box::new(StdRandom::seeded(seed + 1)),
    )
}

#[tokio::test]
async fn test_prices_stay_in_band() {
    let service = seeded_service(42);
    for round in 0..20 {
        for request in sample_requests() {
            let quote = service.compute_price(&request).await.unwrap();
            assert!(quote.price >= request.base_fare * dec!(0.7), "round {round}");
            assert!(quote.price <= request.base_fare * dec!(3.0), "round {round}");
            assert_eq!(quote.multiplier, (quote.price / request.base_fare).round_dp(2));
            assert!(quote.factors.iter().all(|f| f.impact.abs() > dec!(0.01)));
        }
        service.refresh_demand().await;
    }

    let status = service.status().await;
    assert_eq!(status.tracked_flights, 5);
    assert_eq!(status.ledger_entries, 100);
}

#[tokio::test]
async fn test_reference_request_breakdown() {
    let service = seeded_service(3);
    let request = FlightPricingRequest {
        flight_id: "AI-777".to_string(),
        base_fare: dec!(5000),
        total_seats: 100,
        available_seats: 90,
        departure_time: departure_in(240),
        user_id: None,
        search_count: 0,
        is_group_booking: false,
    };

    let quote = service.compute_price(&request).await.unwrap();
    let multiplier_of = |kind: FactorKind| {
        quote
            .factors
            .iter()
            .find(|f| f.kind == kind)
            .map(|f| f.multiplier)
            .unwrap_or(Decimal::ONE)
    };

    let seat = multiplier_of(FactorKind::SeatAvailability);
    assert!(seat == dec!(0.85) || seat == dec!(0.95));
    assert_eq!(multiplier_of(FactorKind::TimeToDeparture), dec!(0.9));
    assert_eq!(multiplier_of(FactorKind::UserBehavior), dec!(1.0));
    assert_eq!(multiplier_of(FactorKind::FraudDiscount), dec!(1.0));
    assert!(!quote.fraud_detected);
    assert_eq!(quote.seat_percentage, 90.0);

    let demand = multiplier_of(FactorKind::Demand(quote.demand_level));
    assert_eq!(demand, quote.demand_level.multiplier());
}

#[tokio::test]
async fn test_cold_start_level_is_repeatable() {
    // two independent services with different randomness
    let a = FareService::with_random(
        &Config::default(),
        Box::new(StdRandom::seeded(1)),
        Box::new(StdRandom::seeded(2)),
    );
    let b = seeded_service(500);
    for service in [&a, &b] {
        service
            .compute_price(&FlightPricingRequest {
                flight_id: "IX-344".to_string(),
                base_fare: dec!(4000),
                total_seats: 180,
                available_seats: 180,
                departure_time: departure_in(100),
                user_id: None,
                search_count: 0,
                is_group_booking: false,
            })
            .await
            .unwrap();
    }

    let history_a = a.price_history("IX-344", 30).await;
    let history_b = b.price_history("IX-344", 30).await;
    assert_eq!(history_a.len(), 1);
    assert_eq!(history_b.len(), 1);

    // without a spike on the first call the seeded level is what was priced
    let snap_a = a.demand_snapshot("IX-344").await.unwrap();
    let snap_b = b.demand_snapshot("IX-344").await.unwrap();
    if snap_a.trend == DemandTrend::Stable && snap_b.trend == DemandTrend::Stable {
        assert_eq!(snap_a.level, snap_b.level);
        assert_eq!(history_a[0].demand_level(), history_b[0].demand_level());
    }
}

#[tokio::test]
async fn test_errors_surface_as_invalid_input() {
    let service = seeded_service(9);
    let mut request = sample_requests().remove(0);
    request.departure_time = "soon".to_string();
    assert!(matches!(
        service.compute_price(&request).await,
        Err(PricingError::InvalidInput(_))
    ));

    assert!(matches!(
        service.demand_snapshot("NEVER-PRICED").await,
        Err(PricingError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_forecast_and_analytics_after_traffic() {
    let service = seeded_service(77);
    for _ in 0..12 {
        for request in sample_requests() {
            service.compute_price(&request).await.unwrap();
        }
    }

    let forecast = service.forecast("UK-955").await.unwrap();
    assert_eq!(forecast.predictions.len(), 30);
    assert_eq!(service.forecast("UK-955").await.unwrap(), forecast);

    let analytics = service.analytics("UK-955").await;
    assert_eq!(analytics.entries, 12);
    assert!(analytics.price_range.min >= dec!(7800) * dec!(0.7));
    assert!(analytics.price_range.max <= dec!(7800) * dec!(3.0));
    // twelve quotes span at most two clock hours
    assert!(analytics.peak_hours.count >= 6);

    let surge_entries = service
        .price_history("UK-955", 30)
        .await
        .iter()
        .filter(|e| e.demand_level() == Some(DemandLevel::Surge))
        .count();
    if surge_entries == 0 {
        assert_eq!(analytics.revenue_opportunities.missed_revenue, dec!(0));
    }

    // the 70-search user on QP-1302 is flagged on every call
    let alerts = service.fraud_alerts(50).await;
    assert_eq!(alerts.len(), 12);
    assert!(alerts.iter().all(|a| a.flight_id == "QP-1302"));
}
