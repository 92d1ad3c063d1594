use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("An error occurred during JSON deserialization: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data file {0} does not exist")]
    MissingFile(PathBuf),

    #[error("Required column '{0}' is missing from the price feed")]
    MissingColumn(&'static str),

    #[error("Malformed row at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Price {price} on {date} is not positive")]
    NonPositivePrice { date: NaiveDate, price: f64 },

    #[error("Date {0} appears more than once in the price feed")]
    DuplicateDate(NaiveDate),

    #[error("The price feed contains no observations")]
    Empty,

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Failed to generate synthetic prices: {0}")]
    Synthetic(String),

    #[error("Event {0} not found")]
    EventNotFound(u32),
}
