use crate::error::AnalyticsError;
use crate::report::{ImpactMetrics, PartitionStats, WindowAnalysis};
use crate::stats::{mean, pct_change, sample_std_dev};
use chrono::{Days, NaiveDate};
use core_types::PricePoint;

/// Returns the sub-slice of an ascending series with `start <= date <= end`.
///
/// Either bound may be omitted. An inverted or non-overlapping range yields an
/// empty slice.
pub fn select_range(
    series: &[PricePoint],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> &[PricePoint] {
    let lo = match start {
        Some(start) => series.partition_point(|p| p.date < start),
        None => 0,
    };
    let hi = match end {
        Some(end) => series.partition_point(|p| p.date <= end),
        None => series.len(),
    };
    if lo >= hi { &[] } else { &series[lo..hi] }
}

/// A stateless calculator for before/after statistics around an anchor date.
#[derive(Debug, Default)]
pub struct WindowStatisticsEngine {}

impl WindowStatisticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzes the window `[anchor - before_days, anchor + after_days]`.
    ///
    /// # Arguments
    ///
    /// * `series` - The full price series, sorted ascending by date.
    /// * `anchor` - The date splitting the window. It belongs to the "after" side.
    /// * `before_days` / `after_days` - Calendar days on either side of the anchor.
    ///
    /// # Returns
    ///
    /// A `WindowAnalysis`, or `AnalyticsError::NoData` if no point falls inside
    /// the window. A missing side is reported as empty statistics and the impact
    /// block is omitted.
    pub fn analyze(
        &self,
        series: &[PricePoint],
        anchor: NaiveDate,
        before_days: u32,
        after_days: u32,
    ) -> Result<WindowAnalysis, AnalyticsError> {
        let window_start = anchor
            .checked_sub_days(Days::new(u64::from(before_days)))
            .unwrap_or(NaiveDate::MIN);
        let window_end = anchor
            .checked_add_days(Days::new(u64::from(after_days)))
            .unwrap_or(NaiveDate::MAX);

        let window = select_range(series, Some(window_start), Some(window_end));
        if window.is_empty() {
            return Err(AnalyticsError::NoData {
                start: window_start,
                end: window_end,
            });
        }

        let split = window.partition_point(|p| p.date < anchor);
        let (before_points, after_points) = window.split_at(split);

        let before = partition_stats(before_points);
        let after = partition_stats(after_points);
        let impact = impact_metrics(&before, &after);

        tracing::debug!(
            %anchor,
            before = before.count,
            after = after.count,
            has_impact = impact.is_some(),
            "Window analysis computed."
        );

        Ok(WindowAnalysis {
            anchor_date: anchor,
            window_start,
            window_end,
            points: window.to_vec(),
            before,
            after,
            impact,
        })
    }
}

fn partition_stats(points: &[PricePoint]) -> PartitionStats {
    if points.is_empty() {
        return PartitionStats::empty();
    }

    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    // The first observation of the series has no return; it is skipped, not zeroed.
    let returns: Vec<f64> = points.iter().filter_map(|p| p.daily_return).collect();

    PartitionStats {
        avg_price: mean(&prices),
        volatility: sample_std_dev(&returns),
        count: points.len(),
    }
}

fn impact_metrics(before: &PartitionStats, after: &PartitionStats) -> Option<ImpactMetrics> {
    let before_avg = before.avg_price?;
    let after_avg = after.avg_price?;

    let volatility_change = match (before.volatility, after.volatility) {
        (Some(b), Some(a)) => Some(a - b),
        _ => None,
    };

    Some(ImpactMetrics {
        price_change: after_avg - before_avg,
        price_change_pct: pct_change(before_avg, after_avg)?,
        volatility_change,
    })
}
