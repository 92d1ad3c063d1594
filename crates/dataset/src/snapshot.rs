use crate::catalog::EventCatalog;
use crate::change_points::ChangePointRegistry;
use crate::error::DataError;
use crate::prices::PriceSeries;
use configuration::DataConfig;

/// The immutable snapshot of every data feed, built once at startup.
///
/// Handlers receive it behind an `Arc`; nothing in it can be mutated after
/// construction, so concurrent reads need no synchronisation.
#[derive(Debug, Clone)]
pub struct Dataset {
    prices: PriceSeries,
    events: EventCatalog,
    change_points: ChangePointRegistry,
}

impl Dataset {
    pub fn new(
        prices: PriceSeries,
        events: EventCatalog,
        change_points: ChangePointRegistry,
    ) -> Self {
        Self {
            prices,
            events,
            change_points,
        }
    }

    /// Loads all three feeds, applying each feed's fallback policy.
    pub fn load(config: &DataConfig) -> Result<Self, DataError> {
        let prices = PriceSeries::load(config)?;
        let events = EventCatalog::load(config.events_json.as_deref());
        let change_points = ChangePointRegistry::load(config.change_points_json.as_deref());

        tracing::info!(
            points = prices.len(),
            start = ?prices.first().map(|p| p.date),
            end = ?prices.last().map(|p| p.date),
            events = events.len(),
            change_points = change_points.len(),
            "Dataset ready."
        );

        Ok(Self::new(prices, events, change_points))
    }

    pub fn prices(&self) -> &PriceSeries {
        &self.prices
    }

    pub fn events(&self) -> &EventCatalog {
        &self.events
    }

    pub fn change_points(&self) -> &ChangePointRegistry {
        &self.change_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use configuration::SyntheticConfig;
    use std::io::Write;
    use std::path::PathBuf;

    fn short_synthetic() -> SyntheticConfig {
        SyntheticConfig {
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2020, 6, 30).unwrap(),
            breaks: vec![],
            ..SyntheticConfig::default()
        }
    }

    #[test]
    fn missing_feed_falls_back_to_synthetic() {
        let config = DataConfig {
            prices_csv: PathBuf::from("/no/such/BrentOilPrices.csv"),
            synthetic: short_synthetic(),
            ..DataConfig::default()
        };
        let dataset = Dataset::load(&config).unwrap();
        assert_eq!(dataset.prices().len(), 182);
        assert_eq!(dataset.events().len(), 13);
        assert_eq!(dataset.change_points().len(), 4);
    }

    #[test]
    fn malformed_feed_falls_back_to_synthetic() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Date,Price\n2020-01-01,50.0\n2020-01-02,-3.0\n").unwrap();
        let config = DataConfig {
            prices_csv: file.path().to_path_buf(),
            synthetic: short_synthetic(),
            ..DataConfig::default()
        };
        let dataset = Dataset::load(&config).unwrap();
        assert_eq!(dataset.prices().len(), 182);
    }

    #[test]
    fn valid_feed_is_used_as_is() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Date,Price\n2020-01-02,51.0\n2020-01-01,50.0\n").unwrap();
        let config = DataConfig {
            prices_csv: file.path().to_path_buf(),
            synthetic: short_synthetic(),
            ..DataConfig::default()
        };
        let dataset = Dataset::load(&config).unwrap();
        let points = dataset.prices().points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].price, 50.0);
        assert!((points[1].daily_return.unwrap() - 2.0).abs() < 1e-9);
    }
}
