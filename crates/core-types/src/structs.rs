use crate::enums::{ChangePointKind, EventCategory, ImpactLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily observation of the price series together with its derived columns.
///
/// Every derived field is an `Option` because it is undefined near the start of
/// the series; `None` serializes as JSON `null` and the key is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
    pub log_price: f64,
    /// Percentage change against the previous observation.
    pub daily_return: Option<f64>,
    /// Sample std-dev of the trailing 30 daily returns.
    pub volatility_30d: Option<f64>,
    pub ma_30: Option<f64>,
    pub ma_90: Option<f64>,
}

/// A labeled historical event from the catalog.
///
/// The serialized keys follow the dashboard's contract (`event`, `type`,
/// `impact`, `price_impact`) rather than the Rust field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    #[serde(rename = "event")]
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub category: EventCategory,
    #[serde(rename = "impact")]
    pub impact_level: ImpactLevel,
    pub description: String,
    /// Display-only, never parsed.
    #[serde(rename = "price_impact")]
    pub nominal_price_impact: String,
}

/// A precomputed structural-break annotation. Passed through unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePoint {
    pub id: u32,
    pub date: NaiveDate,
    pub confidence: f64,
    #[serde(rename = "type")]
    pub kind: ChangePointKind,
    pub magnitude: f64,
    pub description: String,
}
