use crate::error::ConfigError;
use std::path::{Path, PathBuf};

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalysisConfig, DataConfig, LoggingConfig, ServerConfig, Settings, StructuralBreak,
    SyntheticConfig,
};

/// The file read when no explicit path is given. Its absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `GEOBRENT__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "GEOBRENT";

/// Loads the application configuration.
///
/// Sources are layered, later ones winning: built-in defaults, the TOML file
/// (`config.toml` unless `path` is given; an explicit path must exist), then
/// `GEOBRENT__*` environment variables. The result is validated before it is
/// returned.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Missing sections and keys fall back to the `Default` impls via `#[serde(default)]`.
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

/// Command-line overrides, merged on top of every other configuration source.
#[cfg_attr(feature = "clap", derive(clap::Args))]
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Path to a TOML configuration file.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP server to.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub host: Option<String>,

    /// Port to bind the HTTP server to.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub port: Option<u16>,

    /// CSV file with `Date` and `Price` columns.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub prices_csv: Option<PathBuf>,
}

impl CliOverrides {
    /// Loads the configuration and applies these overrides to it.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let mut settings = load_config(self.config.as_deref())?;
        self.apply(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(prices_csv) = &self.prices_csv {
            settings.data.prices_csv = prices_csv.clone();
        }
    }
}
