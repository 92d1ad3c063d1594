use crate::stats::{pct_change, sample_std_dev};
use chrono::{Datelike, Days, NaiveDate};
use core_types::{Event, PricePoint};
use serde::Serialize;
use std::collections::BTreeMap;

/// Inputs to the dashboard summary that are not part of the data snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SummaryParams {
    /// The reference date for year-to-date and "recent" calculations.
    pub today: NaiveDate,
    /// Number of trailing daily returns behind `volatility_30d`.
    pub volatility_window: usize,
    /// Events dated within this many days before `today` count as recent.
    pub recent_event_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentMetrics {
    pub price: Option<f64>,
    pub change_1d: Option<f64>,
    /// Zero when the series has no observation in the current year.
    pub ytd_return: f64,
    pub volatility_30d: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataCoverage {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_days: usize,
    pub total_events: usize,
}

/// Headline metrics for the dashboard landing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub current_metrics: CurrentMetrics,
    pub data_coverage: DataCoverage,
    pub recent_events: usize,
    pub change_points: usize,
    /// Number of catalog events per category label.
    pub event_types: BTreeMap<String, usize>,
}

impl DashboardSummary {
    pub fn compute(
        series: &[PricePoint],
        events: &[Event],
        change_points: usize,
        params: SummaryParams,
    ) -> Self {
        let latest = series.last();

        let current_metrics = CurrentMetrics {
            price: latest.map(|p| p.price),
            change_1d: latest.and_then(|p| p.daily_return),
            ytd_return: ytd_return(series, params.today.year()),
            volatility_30d: trailing_volatility(series, params.volatility_window),
        };

        let data_coverage = DataCoverage {
            start_date: series.first().map(|p| p.date),
            end_date: latest.map(|p| p.date),
            total_days: series.len(),
            total_events: events.len(),
        };

        let recent_cutoff = params
            .today
            .checked_sub_days(Days::new(u64::from(params.recent_event_days)))
            .unwrap_or(NaiveDate::MIN);
        let recent_events = events.iter().filter(|e| e.date >= recent_cutoff).count();

        let mut event_types = BTreeMap::new();
        for event in events {
            *event_types.entry(event.category.label().to_string()).or_insert(0) += 1;
        }

        Self {
            current_metrics,
            data_coverage,
            recent_events,
            change_points,
            event_types,
        }
    }
}

/// Return from the first to the last observation dated in `year`.
fn ytd_return(series: &[PricePoint], year: i32) -> f64 {
    let mut this_year = series.iter().filter(|p| p.date.year() == year);
    let Some(first) = this_year.next() else {
        return 0.0;
    };
    let last = this_year.last().unwrap_or(first);
    pct_change(first.price, last.price).unwrap_or(0.0)
}

/// Sample std-dev of the returns among the last `window` observations.
fn trailing_volatility(series: &[PricePoint], window: usize) -> Option<f64> {
    let start = series.len().saturating_sub(window);
    let returns: Vec<f64> = series[start..].iter().filter_map(|p| p.daily_return).collect();
    sample_std_dev(&returns)
}
