use chrono::NaiveDate;
use core_types::PricePoint;
use serde::Serialize;

/// Statistics for one side of an anchor date.
///
/// An empty side reports `avg_price` and `volatility` as `null` and a count of
/// zero instead of failing the whole analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionStats {
    pub avg_price: Option<f64>,
    /// Sample std-dev of the daily returns on this side.
    pub volatility: Option<f64>,
    #[serde(rename = "days")]
    pub count: usize,
}

impl PartitionStats {
    pub fn empty() -> Self {
        Self {
            avg_price: None,
            volatility: None,
            count: 0,
        }
    }
}

/// Comparative before/after metrics. Only produced when both sides hold data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactMetrics {
    pub price_change: f64,
    pub price_change_pct: f64,
    /// `null` when either side has fewer than two returns.
    pub volatility_change: Option<f64>,
}

/// The result of partitioning the price series around an anchor date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowAnalysis {
    pub anchor_date: NaiveDate,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// Every point in `[window_start, window_end]`, ascending.
    pub points: Vec<PricePoint>,
    pub before: PartitionStats,
    pub after: PartitionStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactMetrics>,
}
