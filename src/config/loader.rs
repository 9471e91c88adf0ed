//! Configuration loading from disk and the environment.

use std::path::Path;
use std::fs;
use crate::config::schema::{LoggerConfig, Mode};
use crate::config::validation::{validate_config, ValidationError};

/// Selects the transport: `production` → Loki, anything else → console.
pub const ENV_MODE: &str = "APP_ENV";
/// Loki base URL.
pub const ENV_SINK_ADDRESS: &str = "LOKI_URL";
/// Minimum level override.
pub const ENV_LEVEL: &str = "LOG_LEVEL";
/// Path of an optional TOML file holding the full configuration.
pub const ENV_CONFIG_PATH: &str = "LOGGER_CONFIG";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolve the configuration from the process environment.
pub fn load_from_env() -> Result<LoggerConfig, ConfigError> {
    resolve_config(|key| std::env::var(key).ok())
}

/// Resolve the configuration from an arbitrary variable lookup.
///
/// Order: defaults, then the TOML file named by `LOGGER_CONFIG` (if any),
/// then individual variables. The result is validated before it is returned.
pub fn resolve_config<F>(lookup: F) -> Result<LoggerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match non_empty(lookup(ENV_CONFIG_PATH)) {
        Some(path) => read_config_file(Path::new(&path))?,
        None => LoggerConfig::default(),
    };

    let config = apply_env_overrides(config, &lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        mode = ?config.mode,
        level = %config.level,
        sink = %config.remote.address,
        "Logger configuration resolved"
    );
    Ok(config)
}

/// Layer individual environment variables over a configuration.
pub fn apply_env_overrides<F>(mut config: LoggerConfig, lookup: F) -> LoggerConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(mode) = lookup(ENV_MODE) {
        config.mode = Mode::from_env_value(Some(&mode));
    }
    // An empty address counts as unset.
    if let Some(address) = non_empty(lookup(ENV_SINK_ADDRESS)) {
        config.remote.address = address;
    }
    if let Some(level) = non_empty(lookup(ENV_LEVEL)) {
        config.level = level.to_ascii_lowercase();
    }
    config
}

fn read_config_file(path: &Path) -> Result<LoggerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
