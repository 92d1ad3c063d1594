use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

const SYNTHETIC_START: NaiveDate = match NaiveDate::from_ymd_opt(1987, 5, 20) {
    Some(date) => date,
    None => panic!("invalid synthetic start date"),
};
const SYNTHETIC_END: NaiveDate = match NaiveDate::from_ymd_opt(2023, 12, 31) {
    Some(date) => date,
    None => panic!("invalid synthetic end date"),
};

/// The root configuration structure for the entire application.
///
/// Every section carries defaults, so an empty `config.toml` (or none at all)
/// yields a fully working service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

/// Where the HTTP surface binds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// The data feeds backing the in-memory stores.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// A CSV with `Date` and `Price` columns. Synthetic data is generated if it
    /// is missing or malformed.
    pub prices_csv: PathBuf,
    /// Optional JSON array replacing the built-in event catalog.
    pub events_json: Option<PathBuf>,
    /// Optional JSON array replacing the built-in change points.
    pub change_points_json: Option<PathBuf>,
    pub synthetic: SyntheticConfig,
}

/// Parameters of the seeded fallback price generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub base_price: f64,
    /// Total drift added linearly from the first to the last day.
    pub trend_span: f64,
    pub noise_std_dev: f64,
    /// Prices below this are replaced by `price_floor + Exp(floor_jitter_mean)`.
    pub price_floor: f64,
    pub floor_jitter_mean: f64,
    pub breaks: Vec<StructuralBreak>,
}

/// A permanent level shift applied from `index` onwards.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StructuralBreak {
    pub index: usize,
    pub shift: f64,
}

/// Window widths used by the analysis endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Days before and after an event for `/api/price-analysis`.
    pub event_window_days: u32,
    /// Days before and after each event for the correlation ranking.
    pub correlation_window_days: u32,
    /// Number of trailing returns behind the dashboard's 30-day volatility.
    pub summary_volatility_window: usize,
    /// Look-back defining a "recent" event on the dashboard.
    pub recent_event_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            prices_csv: PathBuf::from("data/BrentOilPrices.csv"),
            events_json: None,
            change_points_json: None,
            synthetic: SyntheticConfig::default(),
        }
    }
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_date: SYNTHETIC_START,
            end_date: SYNTHETIC_END,
            base_price: 25.0,
            trend_span: 75.0,
            noise_std_dev: 3.0,
            price_floor: 5.0,
            floor_jitter_mean: 5.0,
            breaks: vec![
                StructuralBreak { index: 2000, shift: 15.0 },
                StructuralBreak { index: 4000, shift: -20.0 },
                StructuralBreak { index: 6000, shift: 30.0 },
                StructuralBreak { index: 8000, shift: -15.0 },
                StructuralBreak { index: 10000, shift: 10.0 },
            ],
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            event_window_days: 30,
            correlation_window_days: 5,
            summary_volatility_window: 30,
            recent_event_days: 365,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Settings {
    /// Rejects settings the services cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        let analysis = &self.analysis;
        if analysis.event_window_days == 0
            || analysis.correlation_window_days == 0
            || analysis.summary_volatility_window == 0
            || analysis.recent_event_days == 0
        {
            return Err(ConfigError::ValidationError(
                "analysis window widths must be positive".to_string(),
            ));
        }

        let synthetic = &self.data.synthetic;
        if synthetic.start_date > synthetic.end_date {
            return Err(ConfigError::ValidationError(format!(
                "data.synthetic.start_date {} is after end_date {}",
                synthetic.start_date, synthetic.end_date
            )));
        }
        if !(synthetic.noise_std_dev >= 0.0 && synthetic.noise_std_dev.is_finite()) {
            return Err(ConfigError::ValidationError(
                "data.synthetic.noise_std_dev must be a finite, non-negative number".to_string(),
            ));
        }
        if !(synthetic.price_floor > 0.0 && synthetic.price_floor.is_finite()) {
            return Err(ConfigError::ValidationError(
                "data.synthetic.price_floor must be positive".to_string(),
            ));
        }
        if !(synthetic.floor_jitter_mean > 0.0 && synthetic.floor_jitter_mean.is_finite()) {
            return Err(ConfigError::ValidationError(
                "data.synthetic.floor_jitter_mean must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

impl ServerConfig {
    /// Resolves `host:port` into a bindable address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| {
                ConfigError::ValidationError(format!("invalid server address {}: {e}", self.host))
            })?
            .next()
            .ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "server address {} did not resolve",
                    self.host
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.data.synthetic.breaks.len(), 5);
        assert_eq!(settings.analysis.event_window_days, 30);
    }

    #[test]
    fn zero_window_is_rejected() {
        let mut settings = Settings::default();
        settings.analysis.correlation_window_days = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn inverted_synthetic_range_is_rejected() {
        let mut settings = Settings::default();
        settings.data.synthetic.end_date = NaiveDate::from_ymd_opt(1980, 1, 1).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn socket_addr_resolves_ip_literals() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };
        assert_eq!(server.socket_addr().unwrap().port(), 8080);
    }
}
