use crate::error::DataError;
use crate::prices::Observation;
use chrono::NaiveDate;
use std::path::Path;

/// Date layouts seen in published Brent price files: ISO, `20-May-87`, and
/// `Apr 22, 2020`.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%b-%y", "%b %d, %Y"];

/// Reads `Date` and `Price` columns from a CSV file.
///
/// Header names are matched case-insensitively and any other column is
/// ignored. Rows are returned in file order; sorting and validation happen in
/// `PriceSeries::derive`.
pub fn read_prices_csv(path: &Path) -> Result<Vec<Observation>, DataError> {
    if !path.exists() {
        return Err(DataError::MissingFile(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(DataError::MissingColumn(name))
    };
    let date_idx = column("date")?;
    let price_idx = column("price")?;

    let mut observations = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: one for the header row, one for 1-based line numbers.
        let line = idx + 2;
        let record = result?;

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| DataError::Parse {
            line,
            message: format!("unrecognised date '{raw_date}'"),
        })?;

        let raw_price = record.get(price_idx).unwrap_or_default();
        let price = raw_price.parse::<f64>().map_err(|e| DataError::Parse {
            line,
            message: format!("invalid price '{raw_price}': {e}"),
        })?;

        observations.push(Observation::new(date, price));
    }

    Ok(observations)
}

/// Parses a date in any of the supported layouts.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}
