//! Logger core.
//!
//! # Data Flow
//! ```text
//! Logger::info / warn / ... (logger.rs)
//!     → level filter (level.rs)
//!     → merge base fields + bindings + call-site fields
//!     → LogRecord (record.rs)
//!     → Transport::write (console or Loki)
//!
//! tracing::info! / warn! / ...
//!     → LoggerLayer (bridge.rs)
//!     → Logger::log
//! ```

pub mod bridge;
pub mod level;
pub mod logger;
pub mod record;

pub use bridge::LoggerLayer;
pub use level::{Level, LevelFilter, ParseLevelError};
pub use logger::Logger;
pub use record::LogRecord;
