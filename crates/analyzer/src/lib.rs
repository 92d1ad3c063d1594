use analytics::{AnalyticsError, WindowStatisticsEngine};
use chrono::NaiveDate;
use configuration::AnalysisConfig;
use core_types::{Event, EventCategory, PricePoint};
use dataset::Dataset;
use serde::Serialize;

/// The measured short-window price impact of one catalog event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventImpact {
    pub event_id: u32,
    pub event: String,
    #[serde(rename = "type")]
    pub category: EventCategory,
    pub date: NaiveDate,
    /// Signed percentage change of the mean price, after vs. before.
    pub impact_percentage: f64,
    /// `abs(impact_percentage)`, the ranking key.
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationSummary {
    pub total_events_analyzed: usize,
    /// Mean of the signed impacts; `null` when no event qualified.
    pub avg_impact: Option<f64>,
    /// Largest magnitude, or 0 when no event qualified.
    pub max_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    pub correlations: Vec<EventImpact>,
    pub summary: CorrelationSummary,
}

/// Ranks every catalog event by the size of the price move around it.
pub struct CorrelationAnalyzer {
    window_days: u32,
    engine: WindowStatisticsEngine,
}

impl CorrelationAnalyzer {
    pub const DEFAULT_WINDOW_DAYS: u32 = 5;

    pub fn new(window_days: u32) -> Self {
        Self {
            window_days,
            engine: WindowStatisticsEngine::new(),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.correlation_window_days)
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Measures, filters, and ranks the impact of every event in the catalog.
    ///
    /// Events whose window lacks data on either side of the event date are
    /// skipped rather than reported with partial statistics.
    pub fn rank_all(&self, dataset: &Dataset) -> CorrelationReport {
        let series = dataset.prices().points();

        // 1. Measure
        let impacts: Vec<EventImpact> = dataset
            .events()
            .events()
            .iter()
            .filter_map(|event| self.measure(series, event))
            .collect();

        tracing::debug!(
            window_days = self.window_days,
            analyzed = impacts.len(),
            catalog = dataset.events().len(),
            "Correlation impacts measured."
        );

        // 2. Rank
        rank(impacts)
    }

    fn measure(&self, series: &[PricePoint], event: &Event) -> Option<EventImpact> {
        let analysis = match self
            .engine
            .analyze(series, event.date, self.window_days, self.window_days)
        {
            Ok(analysis) => analysis,
            Err(AnalyticsError::NoData { .. }) => return None,
        };

        let impact = analysis.impact?;
        Some(EventImpact {
            event_id: event.id,
            event: event.name.clone(),
            category: event.category,
            date: event.date,
            impact_percentage: impact.price_change_pct,
            magnitude: impact.price_change_pct.abs(),
        })
    }
}

impl Default for CorrelationAnalyzer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW_DAYS)
    }
}

/// Orders impacts by descending magnitude, ties by ascending event id, and
/// summarizes them.
pub fn rank(mut impacts: Vec<EventImpact>) -> CorrelationReport {
    impacts.sort_by(|a, b| {
        b.magnitude
            .total_cmp(&a.magnitude)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });

    let avg_impact = if impacts.is_empty() {
        None
    } else {
        Some(impacts.iter().map(|i| i.impact_percentage).sum::<f64>() / impacts.len() as f64)
    };
    let max_impact = impacts.iter().map(|i| i.magnitude).fold(0.0, f64::max);

    CorrelationReport {
        summary: CorrelationSummary {
            total_events_analyzed: impacts.len(),
            avg_impact,
            max_impact,
        },
        correlations: impacts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Days;
    use core_types::ImpactLevel;
    use dataset::{ChangePointRegistry, EventCatalog, Observation, PriceSeries};

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Days::new(offset)
    }

    fn impact(event_id: u32, pct: f64) -> EventImpact {
        EventImpact {
            event_id,
            event: format!("event {event_id}"),
            category: EventCategory::Sanctions,
            date: day(u64::from(event_id)),
            impact_percentage: pct,
            magnitude: pct.abs(),
        }
    }

    fn event(id: u32, date: NaiveDate) -> Event {
        Event {
            id,
            name: format!("event {id}"),
            date,
            category: EventCategory::OpecDecision,
            impact_level: ImpactLevel::High,
            description: String::new(),
            nominal_price_impact: String::new(),
        }
    }

    /// A flat series at 100 with three step segments after days 20, 60 and 100.
    fn fixture(events: Vec<Event>) -> Dataset {
        let observations = (0..200u64)
            .map(|i| {
                let price = match i {
                    20..=25 => 105.0,
                    60..=65 => 60.0,
                    100..=105 => 112.0,
                    _ => 100.0,
                };
                Observation::new(day(i), price)
            })
            .collect();
        Dataset::new(
            PriceSeries::derive(observations).unwrap(),
            EventCatalog::new(events).unwrap(),
            ChangePointRegistry::published(),
        )
    }

    #[test]
    fn ranks_by_absolute_impact() {
        let report = rank(vec![impact(1, 5.0), impact(2, -40.0), impact(3, 12.0)]);

        let order: Vec<f64> = report.correlations.iter().map(|c| c.impact_percentage).collect();
        assert_eq!(order, vec![-40.0, 12.0, 5.0]);
        assert_eq!(report.summary.max_impact, 40.0);
        assert_eq!(report.summary.total_events_analyzed, 3);
        assert_relative_eq!(report.summary.avg_impact.unwrap(), -23.0 / 3.0);
    }

    #[test]
    fn ties_are_broken_by_event_id() {
        let report = rank(vec![impact(9, -7.0), impact(4, 7.0), impact(6, 7.0)]);
        let ids: Vec<u32> = report.correlations.iter().map(|c| c.event_id).collect();
        assert_eq!(ids, vec![4, 6, 9]);
    }

    #[test]
    fn empty_ranking_has_zero_max_and_null_average() {
        let report = rank(vec![]);
        assert_eq!(report.summary.max_impact, 0.0);
        assert_eq!(report.summary.avg_impact, None);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["summary"]["avg_impact"].is_null());
        assert_eq!(json["summary"]["max_impact"], 0.0);
    }

    #[test]
    fn rank_all_measures_windows_and_skips_one_sided_events() {
        let dataset = fixture(vec![
            event(1, day(20)),
            event(2, day(60)),
            event(3, day(100)),
            // Before the series starts: nothing in the window at all.
            event(4, day(0) - Days::new(30)),
            // First day of the series: no "before" side.
            event(5, day(0)),
        ]);

        let report = CorrelationAnalyzer::default().rank_all(&dataset);

        let ids: Vec<u32> = report.correlations.iter().map(|c| c.event_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_relative_eq!(report.correlations[0].impact_percentage, -40.0, epsilon = 1e-9);
        assert_relative_eq!(report.correlations[1].impact_percentage, 12.0, epsilon = 1e-9);
        assert_relative_eq!(report.correlations[2].impact_percentage, 5.0, epsilon = 1e-9);
        assert_relative_eq!(report.summary.max_impact, 40.0, epsilon = 1e-9);
        assert_eq!(report.summary.total_events_analyzed, 3);
    }

    #[test]
    fn window_width_is_configurable() {
        let dataset = fixture(vec![event(1, day(20))]);
        // With a 10-day window the after side also covers days 26..=30 at 100.
        let report = CorrelationAnalyzer::new(10).rank_all(&dataset);
        let expected = ((105.0 * 6.0 + 100.0 * 5.0) / 11.0 / 100.0 - 1.0) * 100.0;
        assert_relative_eq!(report.correlations[0].impact_percentage, expected, epsilon = 1e-9);
    }

    #[test]
    fn serializes_with_dashboard_keys() {
        let report = rank(vec![impact(1, -2.0)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["correlations"][0]["type"], "Sanctions");
        assert_eq!(json["correlations"][0]["magnitude"], 2.0);
        assert_eq!(json["summary"]["total_events_analyzed"], 1);
    }
}
