//! Configuration management for datalab.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::anomaly::FlaggerParams;
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "datalab";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "employees.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `DATALAB_`, `__` between sections)
/// 2. TOML config file at `~/.config/datalab/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Anomaly flagger parameters.
    pub anomaly: FlaggerParams,
    /// Synthetic sales configuration.
    pub sales: SalesConfig,
    /// Employee database configuration.
    pub employees: EmployeesConfig,
    /// Price binning configuration.
    pub binning: BinningConfig,
}

/// Synthetic sales generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesConfig {
    /// Number of records to generate.
    pub rows: usize,
    /// Seed of the generator.
    pub seed: u64,
    /// Where the CSV file is written.
    pub output_path: PathBuf,
}

/// Fake employees and the salary report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeesConfig {
    /// Number of employees per generated SQL script.
    pub count: usize,
    /// Path to the database file.
    /// Defaults to `~/.local/share/datalab/employees.db`
    pub database_path: Option<PathBuf>,
    /// Where the salary chart is written.
    pub chart_path: PathBuf,
}

/// Simulated house prices and their bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinningConfig {
    /// Number of prices to draw.
    pub samples: usize,
    /// Mean price, in thousands.
    pub mean: f64,
    /// Standard deviation of the prices, in thousands.
    pub std_dev: f64,
    /// Seed of the generator.
    pub seed: u64,
    /// Where the bin count chart is written.
    pub chart_path: PathBuf,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            rows: 500,
            seed: 42,
            output_path: PathBuf::from("data/synthetic_sales.csv"),
        }
    }
}

impl Default for EmployeesConfig {
    fn default() -> Self {
        Self {
            count: 50,
            database_path: None, // Will be resolved to default at runtime
            chart_path: PathBuf::from("salary_by_position.svg"),
        }
    }
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            mean: 300.0,
            std_dev: 100.0,
            seed: 42,
            chart_path: PathBuf::from("price_categories.svg"),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("DATALAB_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let multiplier = self.anomaly.threshold_multiplier;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!("threshold_multiplier must be positive, got {multiplier}"),
            });
        }

        if self.anomaly.sample_divisor == 0 {
            return Err(Error::ConfigValidation {
                message: "sample_divisor must be greater than 0".to_string(),
            });
        }

        if self.sales.rows == 0 {
            return Err(Error::ConfigValidation {
                message: "sales rows must be greater than 0".to_string(),
            });
        }

        if self.employees.count == 0 {
            return Err(Error::ConfigValidation {
                message: "employee count must be greater than 0".to_string(),
            });
        }

        if self.binning.samples == 0 {
            return Err(Error::ConfigValidation {
                message: "binning samples must be greater than 0".to_string(),
            });
        }

        if !self.binning.std_dev.is_finite() || self.binning.std_dev <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "binning std_dev must be positive, got {}",
                    self.binning.std_dev
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.employees
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.anomaly, FlaggerParams::default());
        assert_eq!(config.sales.rows, 500);
        assert_eq!(config.sales.seed, 42);
        assert_eq!(config.employees.count, 50);
        assert_eq!(config.binning.samples, 1000);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_multiplier() {
        let mut config = Config::default();
        config.anomaly.threshold_multiplier = 0.0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("threshold_multiplier"));
    }

    #[test]
    fn test_validate_zero_divisor() {
        let mut config = Config::default();
        config.anomaly.sample_divisor = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("sample_divisor"));
    }

    #[test]
    fn test_validate_zero_counts() {
        let mut config = Config::default();
        config.sales.rows = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.employees.count = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.binning.samples = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_std_dev() {
        let mut config = Config::default();
        config.binning.std_dev = -3.0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("std_dev"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config.database_path().to_string_lossy().contains("employees.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.employees.database_path = Some(PathBuf::from("/custom/path/lab.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/lab.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("datalab"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("datalab_config_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[anomaly]\nthreshold_multiplier = 2.0\n\n[sales]\nrows = 10\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert!((config.anomaly.threshold_multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.anomaly.sample_divisor, 10);
        assert_eq!(config.sales.rows, 10);
        assert_eq!(config.sales.seed, 42);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path =
            std::env::temp_dir().join(format!("datalab_bad_config_{}.toml", std::process::id()));
        std::fs::write(&path, "[anomaly]\nsample_divisor = 0\n").unwrap();

        let err = Config::load_from(Some(path.clone())).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("threshold_multiplier"));
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
