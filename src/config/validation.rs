//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the Loki address (parseable, http or https)
//! - Validate value ranges (flush interval and timeout > 0)
//! - Reject unknown level names and empty labels
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggerConfig → Result<(), Vec<ValidationError>>
//! - Runs before a logger is built, so a malformed address fails at startup

use thiserror::Error;
use url::Url;

use crate::config::schema::LoggerConfig;
use crate::logging::LevelFilter;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("remote.address `{address}` is not a valid URL: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("remote.address `{0}` must use http or https")]
    UnsupportedScheme(String),

    #[error("remote.flush_interval_secs must be greater than zero")]
    ZeroFlushInterval,

    #[error("remote.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("remote.labels contains an empty key or value")]
    EmptyLabel,

    #[error("unknown log level `{0}`")]
    UnknownLevel(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::UnknownLevel(config.level.clone()));
    }

    let remote = &config.remote;
    match Url::parse(&remote.address) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(_) => errors.push(ValidationError::UnsupportedScheme(remote.address.clone())),
        Err(e) => errors.push(ValidationError::InvalidAddress {
            address: remote.address.clone(),
            reason: e.to_string(),
        }),
    }

    if remote.flush_interval_secs == 0 {
        errors.push(ValidationError::ZeroFlushInterval);
    }
    if remote.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if remote
        .labels
        .iter()
        .any(|(k, v)| k.trim().is_empty() || v.trim().is_empty())
    {
        errors.push(ValidationError::EmptyLabel);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&LoggerConfig::default()).is_ok());
    }

    #[test]
    fn test_malformed_address_rejected() {
        let mut config = LoggerConfig::default();
        config.remote.address = "not a url".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidAddress { .. }));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = LoggerConfig::default();
        config.remote.address = "ftp://loki:3100".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::UnsupportedScheme("ftp://loki:3100".into())]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = LoggerConfig::default();
        config.level = "verbose".to_string();
        config.remote.flush_interval_secs = 0;
        config.remote.timeout_secs = 0;
        config.remote.labels.insert("env".to_string(), " ".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::UnknownLevel("verbose".into())));
        assert!(errors.contains(&ValidationError::ZeroFlushInterval));
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::EmptyLabel));
    }
}
