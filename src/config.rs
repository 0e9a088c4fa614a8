use crate::error::{CalculatorError, Result};
use rust_decimal::Decimal;
use std::env as stdenv;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_BASE_DIR: &str = "CALCULATOR_BASE_DIR";
pub const ENV_LOG_DIR: &str = "CALCULATOR_LOG_DIR";
pub const ENV_LOG_FILE: &str = "CALCULATOR_LOG_FILE";
pub const ENV_HISTORY_DIR: &str = "CALCULATOR_HISTORY_DIR";
pub const ENV_HISTORY_FILE: &str = "CALCULATOR_HISTORY_FILE";
pub const ENV_MAX_HISTORY_SIZE: &str = "CALCULATOR_MAX_HISTORY_SIZE";
pub const ENV_AUTO_SAVE: &str = "CALCULATOR_AUTO_SAVE";
pub const ENV_PRECISION: &str = "CALCULATOR_PRECISION";
pub const ENV_MAX_INPUT_VALUE: &str = "CALCULATOR_MAX_INPUT_VALUE";

/// Largest scale a `Decimal` can carry.
const MAX_PRECISION: u32 = 28;

/// Runtime settings of the calculator.
///
/// Fields are public so callers (and tests) can tweak a config after
/// building it; [`CalculatorConfig::validate`] is run by the calculator
/// before the values are used.
#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    /// Root directory the log and history folders default to.
    pub base_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_file: PathBuf,
    pub history_dir: PathBuf,
    /// CSV file the history is saved to and loaded from.
    pub history_file: PathBuf,
    /// Oldest calculations are dropped once history grows past this.
    pub max_history_size: usize,
    /// Save the history after every calculation.
    pub auto_save: bool,
    /// Decimal places used when printing results.
    pub precision: u32,
    /// Operands with a larger magnitude are rejected.
    pub max_input_value: Decimal,
}

impl CalculatorConfig {
    pub const DEFAULT_MAX_HISTORY_SIZE: usize = 1000;
    pub const DEFAULT_PRECISION: u32 = 10;

    /// Default configuration rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let log_dir = base_dir.join("logs");
        let history_dir = base_dir.join("history");
        Self {
            log_file: log_dir.join("calculator.log"),
            history_file: history_dir.join("calculator_history.csv"),
            log_dir,
            history_dir,
            base_dir,
            max_history_size: Self::DEFAULT_MAX_HISTORY_SIZE,
            auto_save: true,
            precision: Self::DEFAULT_PRECISION,
            max_input_value: Decimal::MAX,
        }
    }

    /// Re-root every derived path under `base_dir`, keeping the other settings.
    pub fn with_base_dir(self, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            max_history_size: self.max_history_size,
            auto_save: self.auto_save,
            precision: self.precision,
            max_input_value: self.max_input_value,
            ..Self::new(base_dir)
        }
    }

    /// Build the configuration from `CALCULATOR_*` process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| stdenv::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Unset keys fall back to defaults; the base directory defaults to the
    /// current working directory.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_dir = lookup(ENV_BASE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| stdenv::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let mut config = Self::new(base_dir);

        if let Some(dir) = lookup(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
            config.log_file = config.log_dir.join("calculator.log");
        }
        if let Some(file) = lookup(ENV_LOG_FILE) {
            config.log_file = PathBuf::from(file);
        }
        if let Some(dir) = lookup(ENV_HISTORY_DIR) {
            config.history_dir = PathBuf::from(dir);
            config.history_file = config.history_dir.join("calculator_history.csv");
        }
        if let Some(file) = lookup(ENV_HISTORY_FILE) {
            config.history_file = PathBuf::from(file);
        }
        if let Some(raw) = lookup(ENV_MAX_HISTORY_SIZE) {
            config.max_history_size = parse_value(ENV_MAX_HISTORY_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_AUTO_SAVE) {
            config.auto_save = parse_flag(ENV_AUTO_SAVE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PRECISION) {
            config.precision = parse_value(ENV_PRECISION, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_INPUT_VALUE) {
            config.max_input_value = parse_value(ENV_MAX_INPUT_VALUE, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_history_size == 0 {
            return Err(CalculatorError::Configuration(
                "max_history_size must be positive".to_string(),
            ));
        }
        if self.precision > MAX_PRECISION {
            return Err(CalculatorError::Configuration(format!(
                "precision must be at most {MAX_PRECISION}"
            )));
        }
        if self.max_input_value <= Decimal::ZERO {
            return Err(CalculatorError::Configuration(
                "max_input_value must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| CalculatorError::Configuration(format!("invalid value for {key}: {raw}")))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(CalculatorError::Configuration(format!(
            "invalid value for {key}: {raw}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_rooted_at_base_dir() {
        let config = CalculatorConfig::new("/tmp/calc");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/calc/logs"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/calc/logs/calculator.log"));
        assert_eq!(config.history_dir, PathBuf::from("/tmp/calc/history"));
        assert_eq!(
            config.history_file,
            PathBuf::from("/tmp/calc/history/calculator_history.csv")
        );
        assert_eq!(config.max_history_size, 1000);
        assert!(config.auto_save);
        assert_eq!(config.precision, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookup_overrides_defaults() {
        let config = CalculatorConfig::from_lookup(lookup_from(&[
            (ENV_BASE_DIR, "/data"),
            (ENV_HISTORY_FILE, "/elsewhere/h.csv"),
            (ENV_MAX_HISTORY_SIZE, "5"),
            (ENV_AUTO_SAVE, "off"),
            (ENV_PRECISION, "3"),
            (ENV_MAX_INPUT_VALUE, "1000"),
        ]))
        .unwrap();

        assert_eq!(config.base_dir, PathBuf::from("/data"));
        assert_eq!(config.log_dir, PathBuf::from("/data/logs"));
        assert_eq!(config.history_file, PathBuf::from("/elsewhere/h.csv"));
        assert_eq!(config.max_history_size, 5);
        assert!(!config.auto_save);
        assert_eq!(config.precision, 3);
        assert_eq!(config.max_input_value, Decimal::from(1000));
    }

    #[test]
    fn test_log_dir_override_moves_log_file() {
        let config =
            CalculatorConfig::from_lookup(lookup_from(&[(ENV_BASE_DIR, "/data"), (ENV_LOG_DIR, "/var/log/calc")]))
                .unwrap();
        assert_eq!(config.log_file, PathBuf::from("/var/log/calc/calculator.log"));
    }

    #[test]
    fn test_unparsable_values_are_configuration_errors() {
        let err = CalculatorConfig::from_lookup(lookup_from(&[(ENV_PRECISION, "many")])).unwrap_err();
        assert!(matches!(err, CalculatorError::Configuration(_)));

        let err = CalculatorConfig::from_lookup(lookup_from(&[(ENV_AUTO_SAVE, "maybe")])).unwrap_err();
        assert!(matches!(err, CalculatorError::Configuration(_)));
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut config = CalculatorConfig::new("/tmp");
        config.max_history_size = 0;
        assert!(config.validate().is_err());

        let mut config = CalculatorConfig::new("/tmp");
        config.max_input_value = Decimal::ZERO;
        assert!(config.validate().is_err());

        let mut config = CalculatorConfig::new("/tmp");
        config.precision = 29;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_base_dir_keeps_settings() {
        let mut config = CalculatorConfig::new("/a");
        config.auto_save = false;
        config.precision = 4;
        let moved = config.with_base_dir("/b");
        assert_eq!(moved.history_dir, PathBuf::from("/b/history"));
        assert!(!moved.auto_save);
        assert_eq!(moved.precision, 4);
    }
}
