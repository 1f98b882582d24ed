/// Segmentation configuration loader - parses humon.toml
///
/// Separates the humidity band, minimum run length and severity table from
/// code, so thresholds can be adjusted without recompiling the service.
/// Every field is optional; anything left out keeps the station default.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::SegmentationConfig;
use crate::analysis::severity::{SeverityRule, validate_rules};
use crate::model::Band;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "HUMON_CONFIG";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid humidity band [{low}, {high}]: expected 0 <= low <= high <= 100")]
    InvalidBand { low: f64, high: f64 },

    #[error("minimum_run_length must be at least 1")]
    InvalidMinimumRunLength,

    #[error("invalid severity table: {0}")]
    InvalidSeverityRules(String),
}

/// Band section of humon.toml
#[derive(Debug, Clone, Deserialize)]
struct BandConfig {
    low: f64,
    high: f64,
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    band: Option<BandConfig>,
    minimum_run_length: Option<usize>,
    #[serde(default, rename = "severity")]
    severity_rules: Vec<SeverityRule>,
}

/// Parses configuration text, falling back to defaults for omitted fields.
pub fn parse_config(contents: &str, path: &Path) -> Result<SegmentationConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = SegmentationConfig::default();
    if let Some(band) = file.band {
        config.band = Band::new(band.low, band.high);
    }
    if let Some(min) = file.minimum_run_length {
        config.minimum_run_length = min;
    }
    if !file.severity_rules.is_empty() {
        config.severity_rules = file.severity_rules;
    }

    validate(&config)?;
    Ok(config)
}

/// Loads and validates configuration from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<SegmentationConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_config(&contents, path)?;
    log::info!(
        "loaded configuration from {}: band {}, minimum run {}",
        path.display(),
        config.band,
        config.minimum_run_length
    );
    Ok(config)
}

/// Loads configuration from the file named by `HUMON_CONFIG` (after reading
/// `.env` if present). Without the variable, returns the station defaults.
pub fn load_from_env() -> Result<SegmentationConfig, ConfigError> {
    dotenv::dotenv().ok();

    match env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => load_config(path.trim()),
        _ => {
            log::debug!("{} not set, using default segmentation config", CONFIG_ENV_VAR);
            Ok(SegmentationConfig::default())
        }
    }
}

/// Checks band bounds, minimum run length and the severity table.
pub fn validate(config: &SegmentationConfig) -> Result<(), ConfigError> {
    let Band { low, high } = config.band;
    let in_range = |v: f64| (0.0..=100.0).contains(&v);
    if !in_range(low) || !in_range(high) || low > high {
        return Err(ConfigError::InvalidBand { low, high });
    }
    if config.minimum_run_length == 0 {
        return Err(ConfigError::InvalidMinimumRunLength);
    }
    validate_rules(&config.severity_rules).map_err(ConfigError::InvalidSeverityRules)
}
