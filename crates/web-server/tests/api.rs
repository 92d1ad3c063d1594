//! API integration tests

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Days, NaiveDate};
use configuration::AnalysisConfig;
use core_types::{Event, EventCategory, ImpactLevel};
use dataset::{ChangePointRegistry, Dataset, EventCatalog, Observation, PriceSeries};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`
use web_server::{AppState, create_router};

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Days::new(offset)
}

fn event(id: u32, date: NaiveDate, category: EventCategory, impact_level: ImpactLevel) -> Event {
    Event {
        id,
        name: format!("event {id}"),
        date,
        category,
        impact_level,
        description: format!("description {id}"),
        nominal_price_impact: "+1%".to_string(),
    }
}

/// 121 daily prices rising 100 -> 220 and three events: one mid-series, one on
/// the first day, one years before the data starts.
fn test_app() -> Router {
    let observations = (0..=120u64)
        .map(|i| Observation::new(day(i), 100.0 + i as f64))
        .collect();
    let events = vec![
        event(1, day(60), EventCategory::OpecDecision, ImpactLevel::High),
        event(2, day(0), EventCategory::Pandemic, ImpactLevel::VeryHigh),
        event(
            3,
            NaiveDate::from_ymd_opt(1990, 8, 2).unwrap(),
            EventCategory::MilitaryConflict,
            ImpactLevel::High,
        ),
    ];
    let dataset = Dataset::new(
        PriceSeries::derive(observations).unwrap(),
        EventCatalog::new(events).unwrap(),
        ChangePointRegistry::published(),
    );
    create_router(AppState::new(dataset, AnalysisConfig::default()))
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = get_json("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_oil_prices_unfiltered() {
    let (status, body) = get_json("/api/oil-prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 121);
    assert_eq!(body["date_range"]["start"], "2020-01-01");
    assert_eq!(body["date_range"]["end"], "2020-04-30");

    let first = &body["data"][0];
    assert_eq!(first["price"], 100.0);
    assert!(first["daily_return"].is_null());
    assert!(first["volatility_30d"].is_null());
    assert!(body["data"][30]["volatility_30d"].is_number());
}

#[tokio::test]
async fn test_oil_prices_date_filter_is_inclusive() {
    let (status, body) =
        get_json("/api/oil-prices?start_date=2020-01-10&end_date=2020-01-19").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 10);
    assert_eq!(body["data"][0]["date"], "2020-01-10");
    assert_eq!(body["data"][9]["date"], "2020-01-19");
}

#[tokio::test]
async fn test_oil_prices_empty_range_has_null_bounds() {
    let (status, body) = get_json("/api/oil-prices?start_date=2030-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 0);
    assert!(body["date_range"]["start"].is_null());
    assert!(body["date_range"]["end"].is_null());
}

#[tokio::test]
async fn test_oil_prices_rejects_malformed_date() {
    let (status, body) = get_json("/api/oil-prices?start_date=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("start_date"));
}

#[tokio::test]
async fn test_repeated_query_keys_are_json_bad_requests() {
    for uri in [
        "/api/oil-prices?start_date=2020-01-01&start_date=2020-01-02",
        "/api/events?type=Pandemic&type=Sanctions",
    ] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(response.headers()["content-type"], "application/json", "{uri}");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().unwrap().contains("duplicate field"), "{uri}");
    }
}

#[tokio::test]
async fn test_events_filters() {
    let (status, body) = get_json("/api/events").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 3);
    assert_eq!(
        body["event_types"],
        serde_json::json!(["OPEC_Decision", "Pandemic", "Military_Conflict"])
    );
    assert_eq!(body["impact_levels"], serde_json::json!(["High", "Very High"]));

    let (_, body) = get_json("/api/events?type=Pandemic").await;
    assert_eq!(body["total_records"], 1);
    assert_eq!(body["data"][0]["id"], 2);
    assert_eq!(body["data"][0]["type"], "Pandemic");

    let (_, body) = get_json("/api/events?impact=High").await;
    assert_eq!(body["total_records"], 2);

    let (_, body) = get_json("/api/events?type=Military_Conflict&impact=Very%20High").await;
    assert_eq!(body["total_records"], 0);

    let (status, body) = get_json("/api/events?type=Volcano").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 0);
    assert_eq!(body["event_types"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_change_points() {
    let (status, body) = get_json("/api/change-points").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 4);
    assert_eq!(body["data"][0]["type"], "mean_shift");
    assert_eq!(body["data"][3]["confidence"], 0.98);
}

#[tokio::test]
async fn test_price_analysis_with_both_sides() {
    let (status, body) = get_json("/api/price-analysis/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event_info"]["id"], 1);
    assert_eq!(body["event_info"]["date"], "2020-03-01");
    assert_eq!(body["event_info"]["type"], "OPEC_Decision");

    // Days 30..=90 of the ramp.
    assert_eq!(body["price_data"].as_array().unwrap().len(), 61);
    assert_eq!(body["statistics"]["before_event"]["days"], 30);
    assert_eq!(body["statistics"]["after_event"]["days"], 31);
    assert_eq!(body["statistics"]["before_event"]["avg_price"], 144.5);
    assert_eq!(body["statistics"]["after_event"]["avg_price"], 175.0);
    assert_eq!(body["impact"]["price_change"], 30.5);
    assert!(body["impact"]["price_change_pct"].is_number());
    assert!(body["impact"]["volatility_change"].is_number());
}

#[tokio::test]
async fn test_price_analysis_with_empty_before_side() {
    let (status, body) = get_json("/api/price-analysis/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["before_event"]["days"], 0);
    assert!(body["statistics"]["before_event"]["avg_price"].is_null());
    assert!(body["statistics"]["before_event"]["volatility"].is_null());
    assert_eq!(body["statistics"]["after_event"]["days"], 31);
    assert!(body.get("impact").is_none());
}

#[tokio::test]
async fn test_price_analysis_without_data_is_404() {
    let (status, body) = get_json("/api/price-analysis/3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No price data available for this period");
}

#[tokio::test]
async fn test_price_analysis_unknown_event_is_404() {
    for uri in ["/api/price-analysis/999", "/api/price-analysis/abc"] {
        let (status, body) = get_json(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "Event not found");
    }
}

#[tokio::test]
async fn test_dashboard_summary() {
    let (status, body) = get_json("/api/dashboard-summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_metrics"]["price"], 220.0);
    assert!(body["current_metrics"]["change_1d"].is_number());
    assert!(body["current_metrics"]["volatility_30d"].is_number());
    // The fixture is dated 2020, so the current year has no data.
    assert_eq!(body["current_metrics"]["ytd_return"], 0.0);
    assert_eq!(body["data_coverage"]["start_date"], "2020-01-01");
    assert_eq!(body["data_coverage"]["end_date"], "2020-04-30");
    assert_eq!(body["data_coverage"]["total_days"], 121);
    assert_eq!(body["data_coverage"]["total_events"], 3);
    assert_eq!(body["change_points"], 4);
    assert_eq!(body["event_types"]["Pandemic"], 1);
}

#[tokio::test]
async fn test_correlation_analysis_skips_one_sided_events() {
    let (status, body) = get_json("/api/correlation-analysis").await;
    assert_eq!(status, StatusCode::OK);

    let correlations = body["correlations"].as_array().unwrap();
    assert_eq!(correlations.len(), 1);
    assert_eq!(correlations[0]["event_id"], 1);
    assert_eq!(body["summary"]["total_events_analyzed"], 1);

    // Days 55..=59 average 157, days 60..=65 average 162.5.
    let expected = (162.5 / 157.0 - 1.0) * 100.0;
    let actual = correlations[0]["impact_percentage"].as_f64().unwrap();
    assert!((actual - expected).abs() < 1e-9);
    assert_eq!(body["summary"]["max_impact"], correlations[0]["magnitude"]);
}

#[tokio::test]
async fn test_cors_headers_are_present() {
    let request = Request::builder()
        .uri("/api/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
