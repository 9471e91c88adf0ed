//! Logger construction.
//!
//! # Responsibilities
//! - Validate the resolved configuration
//! - Pick the transport for the configured mode
//! - Wrap transport, base fields and minimum level into a `Logger`
//!
//! # Design Decisions
//! - Production → Loki, everything else → pretty console; decided once
//! - No global: the caller owns the returned handle and passes it down

use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Handle;

use crate::config::{load_from_env, validate_config, ConfigError, LoggerConfig, Mode, ValidationError};
use crate::logging::{LevelFilter, Logger};
use crate::transport::{
    ConsoleTransport, HttpSink, LokiSink, LokiTransport, SinkError, Transport, TransportKind,
};

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("The Loki transport requires a running Tokio runtime")]
    NoRuntime,

    #[error("A Loki sink was supplied but the logger is not in production mode")]
    ModeMismatch,

    #[error("Failed to build the Loki client: {0}")]
    Client(#[from] SinkError),
}

/// Builds the application logger from a `LoggerConfig`.
#[derive(Debug, Clone)]
pub struct LoggerFactory {
    config: LoggerConfig,
}

impl LoggerFactory {
    pub fn new(config: LoggerConfig) -> Self {
        Self { config }
    }

    /// Resolve `APP_ENV`, `LOKI_URL`, `LOG_LEVEL` and `LOGGER_CONFIG`.
    pub fn from_env() -> Result<Self, FactoryError> {
        Ok(Self::new(load_from_env()?))
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// The transport `build` will create.
    pub fn transport_kind(&self) -> TransportKind {
        match self.config.mode {
            Mode::Production => TransportKind::Loki,
            Mode::Development => TransportKind::Console,
        }
    }

    /// Build the logger with the transport selected by the configured mode.
    ///
    /// In production this spawns the Loki batching task on the current Tokio
    /// runtime.
    pub fn build(&self) -> Result<Logger, FactoryError> {
        let filter = self.validate()?;

        let transport: Arc<dyn Transport> = match self.config.mode {
            Mode::Production => {
                let handle = Handle::try_current().map_err(|_| FactoryError::NoRuntime)?;
                let sink = HttpSink::new(&self.config.remote)?;
                tracing::debug!(endpoint = %sink.endpoint(), "Using Loki HTTP sink");
                Arc::new(LokiTransport::spawn(&handle, &self.config.remote, sink))
            }
            Mode::Development => Arc::new(ConsoleTransport::new(&self.config.console)),
        };

        Ok(self.assemble(filter, transport))
    }

    /// Build a production logger that pushes to `sink` instead of HTTP.
    pub fn build_with_sink<K: LokiSink>(&self, sink: K) -> Result<Logger, FactoryError> {
        if self.config.mode != Mode::Production {
            return Err(FactoryError::ModeMismatch);
        }
        let filter = self.validate()?;
        let handle = Handle::try_current().map_err(|_| FactoryError::NoRuntime)?;

        let transport = Arc::new(LokiTransport::spawn(&handle, &self.config.remote, sink));
        Ok(self.assemble(filter, transport))
    }

    /// Build a logger over an already constructed transport.
    pub fn build_with_transport(&self, transport: Arc<dyn Transport>) -> Result<Logger, FactoryError> {
        let filter = self.validate()?;
        Ok(self.assemble(filter, transport))
    }

    fn validate(&self) -> Result<LevelFilter, FactoryError> {
        validate_config(&self.config).map_err(ConfigError::Validation)?;
        self.config
            .level
            .parse::<LevelFilter>()
            .map_err(|e| ConfigError::Validation(vec![ValidationError::UnknownLevel(e.0)]).into())
    }

    fn assemble(&self, filter: LevelFilter, transport: Arc<dyn Transport>) -> Logger {
        tracing::info!(
            mode = ?self.config.mode,
            transport = ?transport.kind(),
            level = %self.config.level,
            "Logger configured"
        );
        Logger::new(filter, self.config.base.clone(), transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Level;
    use crate::transport::{MemoryTransport, PushRequest};
    use futures_util::future::{self, BoxFuture};
    use futures_util::FutureExt;

    fn production() -> LoggerConfig {
        LoggerConfig {
            mode: Mode::Production,
            ..LoggerConfig::default()
        }
    }

    #[test]
    fn test_transport_kind_follows_mode() {
        assert_eq!(LoggerFactory::new(production()).transport_kind(), TransportKind::Loki);
        assert_eq!(
            LoggerFactory::new(LoggerConfig::default()).transport_kind(),
            TransportKind::Console
        );
    }

    #[test]
    fn test_development_builds_console_without_runtime() {
        let logger = LoggerFactory::new(LoggerConfig::default()).build().unwrap();
        assert_eq!(logger.transport_kind(), TransportKind::Console);
        assert_eq!(logger.filter(), LevelFilter::AtLeast(Level::Info));
    }

    #[test]
    fn test_production_requires_runtime() {
        let err = LoggerFactory::new(production()).build().unwrap_err();
        assert!(matches!(err, FactoryError::NoRuntime));
    }

    #[tokio::test]
    async fn test_production_builds_loki() {
        let logger = LoggerFactory::new(production()).build().unwrap();
        assert_eq!(logger.transport_kind(), TransportKind::Loki);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = LoggerConfig::default();
        config.remote.address = "::nope::".to_string();

        let err = LoggerFactory::new(config).build().unwrap_err();
        assert!(matches!(err, FactoryError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn test_custom_sink_needs_production() {
        struct NullSink;
        impl LokiSink for NullSink {
            fn push(&self, _request: PushRequest) -> BoxFuture<'_, Result<(), SinkError>> {
                future::ready(Ok(())).boxed()
            }
        }

        let err = LoggerFactory::new(LoggerConfig::default())
            .build_with_sink(NullSink)
            .unwrap_err();
        assert!(matches!(err, FactoryError::ModeMismatch));
    }

    #[test]
    fn test_base_fields_and_level_applied() {
        let mut config = LoggerConfig::default();
        config.level = "warn".to_string();
        let transport = MemoryTransport::new();

        let logger = LoggerFactory::new(config)
            .build_with_transport(Arc::new(transport.clone()))
            .unwrap();
        logger.info("dropped");
        logger.warn("kept");

        let records = transport.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields["service"], "web-backend");
    }
}
