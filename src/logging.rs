use crate::config::CalculatorConfig;
use crate::error::{CalculatorError, Result};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install a global plain-text subscriber appending to `config.log_file`.
///
/// The level defaults to `info` and can be overridden through `RUST_LOG`.
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &CalculatorConfig) -> Result<()> {
    if let Some(parent) = config.log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| CalculatorError::Configuration(format!("failed to set up logging: {e}")))?;

    tracing::info!("Logging initialized at: {}", config.log_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_logging_writes_to_log_file() {
        let dir = TempDir::new().unwrap();
        let config = CalculatorConfig::new(dir.path());
        init_logging(&config).unwrap();

        tracing::error!("probe message from logging test");
        let content = fs::read_to_string(&config.log_file).unwrap();
        assert!(content.contains("probe message from logging test"));

        // only one global subscriber per process
        assert!(init_logging(&config).is_err());
    }
}
