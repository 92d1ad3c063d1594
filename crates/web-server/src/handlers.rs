use crate::{AppState, error::AppError};
use analytics::{
    DashboardSummary, ImpactMetrics, PartitionStats, SummaryParams, WindowStatisticsEngine,
};
use analyzer::{CorrelationAnalyzer, CorrelationReport};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use chrono::{NaiveDate, Utc};
use core_types::{ChangePoint, Event, EventCategory, ImpactLevel, PricePoint};
use dataset::csv_source::parse_date;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct PricesResponse {
    pub data: Vec<PricePoint>,
    pub total_records: usize,
    pub date_range: DateRange,
}

#[derive(Debug, Deserialize)]
pub struct EventQuery {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub impact: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub data: Vec<Event>,
    pub total_records: usize,
    pub event_types: Vec<EventCategory>,
    pub impact_levels: Vec<ImpactLevel>,
}

#[derive(Debug, Serialize)]
pub struct ChangePointsResponse {
    pub data: Vec<ChangePoint>,
    pub total_records: usize,
}

#[derive(Debug, Serialize)]
pub struct EventInfo {
    pub id: u32,
    pub event: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub category: EventCategory,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct WindowPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub daily_return: Option<f64>,
    pub volatility_30d: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct WindowStatistics {
    pub before_event: PartitionStats,
    pub after_event: PartitionStats,
}

#[derive(Debug, Serialize)]
pub struct PriceAnalysisResponse {
    pub event_info: EventInfo,
    pub price_data: Vec<WindowPoint>,
    pub statistics: WindowStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactMetrics>,
}

/// An event filter parsed from a query string value.
enum Filter<T> {
    Any,
    Only(T),
    /// The value names no known variant, so nothing can match.
    Unmatchable,
}

impl<T: FromStr> Filter<T> {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Filter::Any,
            Some(value) => value.parse().map_or(Filter::Unmatchable, Filter::Only),
        }
    }

    fn into_option(self) -> Option<Option<T>> {
        match self {
            Filter::Any => Some(None),
            Filter::Only(value) => Some(Some(value)),
            Filter::Unmatchable => None,
        }
    }
}

fn parse_query_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse_date(value)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid {name}: '{value}'"))),
    }
}

/// # GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// # GET /api/oil-prices
/// Returns the price series, optionally restricted to an inclusive date range.
pub async fn get_oil_prices(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<PricesResponse>, AppError> {
    let Query(params) = query?;
    let start = parse_query_date("start_date", params.start_date.as_deref())?;
    let end = parse_query_date("end_date", params.end_date.as_deref())?;

    let data = state.dataset.prices().query(start, end);
    let date_range = DateRange {
        start: data.first().map(|p| p.date),
        end: data.last().map(|p| p.date),
    };

    Ok(Json(PricesResponse {
        total_records: data.len(),
        data,
        date_range,
    }))
}

/// # GET /api/events
/// Filters the catalog by exact category (`type`) and impact level (`impact`).
/// A malformed query string, such as a repeated key, is a 400.
pub async fn get_events(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EventQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, AppError> {
    let Query(params) = query?;
    let catalog = state.dataset.events();
    let category = Filter::<EventCategory>::parse(params.event_type.as_deref()).into_option();
    let impact = Filter::<ImpactLevel>::parse(params.impact.as_deref()).into_option();

    let data = match (category, impact) {
        (Some(category), Some(impact)) => catalog.query(category, impact),
        _ => Vec::new(),
    };

    Ok(Json(EventsResponse {
        total_records: data.len(),
        data,
        event_types: catalog.categories(),
        impact_levels: catalog.impact_levels(),
    }))
}

/// # GET /api/change-points
pub async fn get_change_points(State(state): State<Arc<AppState>>) -> Json<ChangePointsResponse> {
    let data = state.dataset.change_points().all().to_vec();
    Json(ChangePointsResponse {
        total_records: data.len(),
        data,
    })
}

/// # GET /api/price-analysis/:event_id
/// Before/after statistics in a symmetric window around one event.
pub async fn get_price_analysis(
    Path(event_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PriceAnalysisResponse>, AppError> {
    // A non-numeric id cannot name an event.
    let id: u32 = event_id
        .trim()
        .parse()
        .map_err(|_| AppError::NotFound("Event not found".to_string()))?;
    let event = state.dataset.events().get(id)?;

    let window = state.analysis.event_window_days;
    let analysis = WindowStatisticsEngine::new().analyze(
        state.dataset.prices().points(),
        event.date,
        window,
        window,
    )?;

    let price_data = analysis
        .points
        .iter()
        .map(|p| WindowPoint {
            date: p.date,
            price: p.price,
            daily_return: p.daily_return,
            volatility_30d: p.volatility_30d,
        })
        .collect();

    Ok(Json(PriceAnalysisResponse {
        event_info: EventInfo {
            id: event.id,
            event: event.name.clone(),
            date: event.date,
            category: event.category,
            description: event.description.clone(),
        },
        price_data,
        statistics: WindowStatistics {
            before_event: analysis.before,
            after_event: analysis.after,
        },
        impact: analysis.impact,
    }))
}

/// # GET /api/dashboard-summary
pub async fn get_dashboard_summary(State(state): State<Arc<AppState>>) -> Json<DashboardSummary> {
    let params = SummaryParams {
        today: Utc::now().date_naive(),
        volatility_window: state.analysis.summary_volatility_window,
        recent_event_days: state.analysis.recent_event_days,
    };
    Json(DashboardSummary::compute(
        state.dataset.prices().points(),
        state.dataset.events().events(),
        state.dataset.change_points().len(),
        params,
    ))
}

/// # GET /api/correlation-analysis
/// Every event ranked by the absolute price move in a short window around it.
pub async fn get_correlation_analysis(
    State(state): State<Arc<AppState>>,
) -> Json<CorrelationReport> {
    let analyzer = CorrelationAnalyzer::from_config(&state.analysis);
    Json(analyzer.rank_all(&state.dataset))
}
