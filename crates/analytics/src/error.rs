use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("No price data available between {start} and {end}")]
    NoData { start: NaiveDate, end: NaiveDate },
}
