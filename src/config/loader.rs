//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration and seed records from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{PayrollError, PayrollResult};

use super::types::{PayrollSettings, SeedData, ServerSettings, ServiceConfig};

/// Loads and provides access to service configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── payroll.yaml   # Server and payroll settings (required)
/// └── seed.yaml      # Records loaded into the in-memory store (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use site_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Listening on {}", loader.server().bind_address);
/// # Ok::<(), site_payroll::error::PayrollError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ServiceConfig,
    seed: SeedData,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `payroll.yaml` is missing, if either file contains
    /// invalid YAML, or if a seed record fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();

        let config = Self::load_yaml::<ServiceConfig>(&path.join("payroll.yaml"))?;

        let seed_path = path.join("seed.yaml");
        let seed = if seed_path.exists() {
            let seed = Self::load_yaml::<SeedData>(&seed_path)?;
            seed.validate().map_err(|e| PayrollError::ConfigParseError {
                path: seed_path.display().to_string(),
                message: e.to_string(),
            })?;
            seed
        } else {
            SeedData::default()
        };

        Ok(Self { config, seed })
    }

    /// Builds a loader from already-parsed parts.
    pub fn from_parts(config: ServiceConfig, seed: SeedData) -> Self {
        Self { config, seed }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the full service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerSettings {
        &self.config.server
    }

    /// Returns the payroll settings.
    pub fn payroll(&self) -> &PayrollSettings {
        &self.config.payroll
    }

    /// Returns the seed records.
    pub fn seed(&self) -> &SeedData {
        &self.seed
    }

    /// Consumes the loader, returning the configuration and seed records.
    pub fn into_parts(self) -> (ServiceConfig, SeedData) {
        (self.config, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompensationType, CutWeekday};
    use chrono::Weekday;

    fn config_path() -> &'static str {
        "./config"
    }

    fn write_temp_config(name: &str, payroll_yaml: &str, seed_yaml: Option<&str>) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("site-payroll-{}-{}", name, uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("payroll.yaml"), payroll_yaml).unwrap();
        if let Some(seed_yaml) = seed_yaml {
            fs::write(dir.join("seed.yaml"), seed_yaml).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.payroll().default_cut_weekday, CutWeekday::THURSDAY);
        assert_eq!(loader.payroll().currency_symbol, "R$");
    }

    #[test]
    fn test_seed_records_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let seed = loader.seed();

        assert!(!seed.sites.is_empty());
        assert!(seed
            .workers
            .iter()
            .any(|w| w.compensation_type == CompensationType::AreaRate));
        assert!(!seed.roles.is_empty());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(PayrollError::ConfigNotFound { path }) => {
                assert!(path.contains("payroll.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_seed_file_yields_empty_seed() {
        let dir = write_temp_config("noseed", "payroll:\n  default_cut_weekday: 5\n", None);

        let loader = ConfigLoader::load(&dir).unwrap();
        assert!(loader.seed().workers.is_empty());
        assert_eq!(
            loader.payroll().default_cut_weekday.weekday(),
            Weekday::Fri
        );
        assert_eq!(loader.server().bind_address, "127.0.0.1:3000");

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_out_of_range_cut_weekday_is_a_parse_error() {
        let dir = write_temp_config("badcut", "payroll:\n  default_cut_weekday: 8\n", None);

        match ConfigLoader::load(&dir) {
            Err(PayrollError::ConfigParseError { path, .. }) => {
                assert!(path.contains("payroll.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_seed_record_failing_validation_is_a_parse_error() {
        let seed_yaml = r#"
workers:
  - id: w-bad
    name: Negative Rate
    compensation_type: hourly
    default_daily_rate: "-90"
"#;
        let dir = write_temp_config("invalidseed", "server: {}\n", Some(seed_yaml));

        match ConfigLoader::load(&dir) {
            Err(PayrollError::ConfigParseError { path, message }) => {
                assert!(path.contains("seed.yaml"));
                assert!(message.contains("w-bad"));
                assert!(message.contains("must not be negative"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_seed_hours_beyond_one_day_are_rejected() {
        let seed_yaml = r#"
attendance:
  - id: a-bad
    site_id: s-1
    worker_id: w-1
    date: 2026-10-13
    worked_hours: "30"
"#;
        let dir = write_temp_config("longday", "server: {}\n", Some(seed_yaml));

        assert!(matches!(
            ConfigLoader::load(&dir),
            Err(PayrollError::ConfigParseError { .. })
        ));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_invalid_seed_yaml_is_a_parse_error() {
        let dir = write_temp_config("badseed", "server: {}\n", Some("workers: [unterminated"));

        match ConfigLoader::load(&dir) {
            Err(PayrollError::ConfigParseError { path, .. }) => {
                assert!(path.contains("seed.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }
}
