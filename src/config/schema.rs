//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the logger.
//! All types derive Serde traits so they can be read from a TOML file and
//! then overridden from the environment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default Loki base URL used when `LOKI_URL` is unset.
pub const DEFAULT_SINK_ADDRESS: &str = "http://localhost:3100";

/// Default interval between Loki pushes.
pub const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 5;

/// Root configuration for the logger.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Deployment mode; selects the transport.
    pub mode: Mode,

    /// Minimum level name (trace, debug, info, warn, error, fatal, silent).
    pub level: String,

    /// Fields attached to every record.
    pub base: Map<String, Value>,

    /// Pretty console settings (development).
    pub console: ConsoleConfig,

    /// Loki settings (production).
    pub remote: RemoteConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let mut base = Map::new();
        base.insert("service".to_string(), Value::from("web-backend"));

        Self {
            mode: Mode::Development,
            level: "info".to_string(),
            base,
            console: ConsoleConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Production,
    #[default]
    Development,
}

impl Mode {
    /// Interpret an environment-mode value.
    ///
    /// Only the exact literal `production` selects production; anything else,
    /// including an absent variable, is development.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Mode::Production,
            _ => Mode::Development,
        }
    }
}

/// Pretty console configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Emit ANSI colors.
    pub colorize: bool,

    /// Timestamp layout (`HH`, `MM`, `ss`, `l`, `Z` tokens).
    pub translate_time: String,

    /// Record keys never rendered.
    pub ignore: Vec<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            colorize: true,
            translate_time: "HH:MM:ss Z".to_string(),
            ignore: vec!["pid".to_string(), "hostname".to_string()],
        }
    }
}

/// Loki push configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Loki base URL (the push path is appended).
    pub address: String,

    /// Seconds between batch pushes.
    pub flush_interval_secs: u64,

    /// Stream labels sent with every batch.
    pub labels: BTreeMap<String, String>,

    /// Per-push request timeout in seconds.
    pub timeout_secs: u64,

    /// Optional HTTP basic auth.
    pub basic_auth: Option<BasicAuth>,

    /// Extra HTTP headers sent with every push.
    pub headers: BTreeMap<String, String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let mut labels = BTreeMap::new();
        labels.insert("app".to_string(), "web-app".to_string());

        Self {
            address: DEFAULT_SINK_ADDRESS.to_string(),
            flush_interval_secs: DEFAULT_FLUSH_INTERVAL_SECS,
            labels,
            timeout_secs: 30,
            basic_auth: None,
            headers: BTreeMap::new(),
        }
    }
}

/// HTTP basic auth credentials for the Loki endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}
