//! Application logger for the web backend.
//!
//! Resolves a `LoggerConfig` once at startup, selects a transport (pretty
//! console in development, batched Loki pushes in production) and returns a
//! `Logger` handle that the application clones into every component.

pub mod config;
pub mod factory;
pub mod logging;
pub mod observability;
pub mod transport;

pub use config::LoggerConfig;
pub use factory::{FactoryError, LoggerFactory};
pub use logging::{Level, Logger, LoggerLayer};
pub use transport::{Transport, TransportKind};
