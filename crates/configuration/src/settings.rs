use crate::error::ConfigError;
use core_types::PredictionBasis;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional; a missing section falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetSettings,
    pub analysis: AnalysisSettings,
    pub taxes: TaxSettings,
    pub logging: LoggingSettings,
}

/// Where the listings come from and how to read them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Path to the listings CSV.
    pub path: PathBuf,
    /// Whether `predicted_price` is a total or a per-square-metre value.
    pub prediction_basis: PredictionBasis,
}

/// Default inputs for an analysis run. CLI flags override them per request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub renovation_cost_per_area: Decimal,
    pub commission: Decimal,
    /// Competitor search radius in metres.
    pub radius_meters: f64,
    pub project_months: u32,
}

/// Tax rates applied to a positive profit. 0.13 corresponds to 13%.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TaxSettings {
    pub personal_income_rate: Decimal,
    pub simplified_rate: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive. `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs also go to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

// --- Default Implementations ---

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/listings.csv"),
            prediction_basis: PredictionBasis::Total,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            renovation_cost_per_area: dec!(1000),
            commission: Decimal::ZERO,
            radius_meters: 1500.0,
            project_months: 12,
        }
    }
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            personal_income_rate: dec!(0.13),
            simplified_rate: dec!(0.06),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "flipscope.log".to_string(),
        }
    }
}

impl Config {
    /// Rejects settings that would make every analysis fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;
        if analysis.renovation_cost_per_area.is_sign_negative() {
            return Err(ConfigError::ValidationError(
                "analysis.renovation_cost_per_area must not be negative".to_string(),
            ));
        }
        if analysis.commission.is_sign_negative() {
            return Err(ConfigError::ValidationError(
                "analysis.commission must not be negative".to_string(),
            ));
        }
        if !analysis.radius_meters.is_finite() || analysis.radius_meters < 0.0 {
            return Err(ConfigError::ValidationError(
                "analysis.radius_meters must be a non-negative number".to_string(),
            ));
        }
        if analysis.project_months == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.project_months must be at least 1".to_string(),
            ));
        }
        for (name, rate) in [
            ("taxes.personal_income_rate", self.taxes.personal_income_rate),
            ("taxes.simplified_rate", self.taxes.simplified_rate),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0 and 1"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.radius_meters, 1500.0);
        assert_eq!(config.taxes.personal_income_rate, dec!(0.13));
        assert_eq!(config.dataset.prediction_basis, PredictionBasis::Total);
    }

    #[test]
    fn negative_radius_is_rejected() {
        let mut config = Config::default();
        config.analysis.radius_meters = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn tax_rate_above_one_is_rejected() {
        let mut config = Config::default();
        config.taxes.simplified_rate = dec!(1.5);
        assert!(config.validate().is_err());
    }
}
