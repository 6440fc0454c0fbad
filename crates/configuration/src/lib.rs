use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{AnalysisSettings, Config, DatasetSettings, LoggingSettings, TaxSettings};

/// Prefix for environment overrides, e.g. `FLIP__ANALYSIS__RADIUS_METERS=2000`.
pub const ENV_PREFIX: &str = "FLIP";

/// Loads the application configuration.
///
/// Sources, lowest priority first: built-in defaults, the TOML file, then
/// `FLIP__`-prefixed environment variables. Without an explicit path an
/// optional `config.toml` in the working directory is used; an explicit path
/// must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config.toml").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
