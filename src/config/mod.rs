//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file named by LOGGER_CONFIG (loader.rs)
//!     → APP_ENV / LOKI_URL / LOG_LEVEL overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → LoggerConfig (validated, immutable)
//!     → handed to the LoggerFactory once at startup
//! ```
//!
//! # Design Decisions
//! - Config is resolved once; the selected transport never changes afterwards
//! - All fields have defaults to allow an empty environment
//! - A malformed sink address fails at startup instead of falling back

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, resolve_config, ConfigError};
pub use schema::{BasicAuth, ConsoleConfig, LoggerConfig, Mode, RemoteConfig};
pub use validation::{validate_config, ValidationError};
