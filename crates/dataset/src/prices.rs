use crate::csv_source::read_prices_csv;
use crate::error::DataError;
use crate::synthetic;
use analytics::{RollingWindow, select_range};
use chrono::NaiveDate;
use configuration::DataConfig;
use core_types::PricePoint;

/// Trailing returns behind `volatility_30d`.
pub const VOLATILITY_WINDOW: usize = 30;
/// Trailing prices behind `ma_30`.
pub const SHORT_MA_WINDOW: usize = 30;
/// Trailing prices behind `ma_90`.
pub const LONG_MA_WINDOW: usize = 90;

/// A raw dated price, before any derived column is computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub price: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// The daily price series, strictly ascending by date with no duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Loads the configured CSV feed, falling back to synthetic data.
    ///
    /// A missing file is expected in development and logged at `info`; a file
    /// that exists but is rejected is logged at `warn`. Only a failure of the
    /// synthetic generator itself is returned as an error.
    pub fn load(config: &DataConfig) -> Result<Self, DataError> {
        let path = &config.prices_csv;

        match read_prices_csv(path).and_then(Self::derive) {
            Ok(series) => {
                tracing::info!(
                    path = %path.display(),
                    points = series.len(),
                    "Loaded price feed."
                );
                return Ok(series);
            }
            Err(DataError::MissingFile(_)) => {
                tracing::info!(
                    path = %path.display(),
                    "Price feed not found, generating synthetic prices."
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Price feed rejected, generating synthetic prices."
                );
            }
        }

        let series = Self::derive(synthetic::generate(&config.synthetic)?)?;
        tracing::info!(
            seed = config.synthetic.seed,
            points = series.len(),
            "Generated synthetic price series."
        );
        Ok(series)
    }

    /// Sorts the observations and computes every derived column in one pass.
    ///
    /// Fails if the input is empty, contains a duplicate date, or contains a
    /// price that is not a finite positive number (its logarithm is undefined).
    pub fn derive(mut observations: Vec<Observation>) -> Result<Self, DataError> {
        if observations.is_empty() {
            return Err(DataError::Empty);
        }

        observations.sort_by_key(|o| o.date);
        if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(DataError::DuplicateDate(pair[0].date));
        }
        if let Some(bad) = observations
            .iter()
            .find(|o| !(o.price > 0.0 && o.price.is_finite()))
        {
            return Err(DataError::NonPositivePrice {
                date: bad.date,
                price: bad.price,
            });
        }

        let mut volatility = RollingWindow::new(VOLATILITY_WINDOW);
        let mut ma_short = RollingWindow::new(SHORT_MA_WINDOW);
        let mut ma_long = RollingWindow::new(LONG_MA_WINDOW);
        let mut previous: Option<f64> = None;

        let points = observations
            .into_iter()
            .map(|obs| {
                let daily_return = previous.map(|prev| (obs.price / prev - 1.0) * 100.0);
                if let Some(r) = daily_return {
                    volatility.push(r);
                }
                ma_short.push(obs.price);
                ma_long.push(obs.price);
                previous = Some(obs.price);

                PricePoint {
                    date: obs.date,
                    price: obs.price,
                    log_price: obs.price.ln(),
                    daily_return,
                    volatility_30d: volatility.std_dev(),
                    ma_30: ma_short.mean(),
                    ma_90: ma_long.mean(),
                }
            })
            .collect();

        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Borrowed view of the points with `start <= date <= end`.
    pub fn range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> &[PricePoint] {
        select_range(&self.points, start, end)
    }

    /// Owned copy of `range`, for handlers that hand the points off.
    pub fn query(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<PricePoint> {
        self.range(start, end).to_vec()
    }
}
