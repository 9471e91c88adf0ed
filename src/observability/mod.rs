//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! This crate's own events (push failures, transport start/stop)
//!     → logging.rs (fmt layer on stderr, RUST_LOG filtered)
//!
//! Application tracing events
//!     → logging.rs (LoggerLayer) → Logger → transport
//!
//! Logger and transport counters
//!     → metrics.rs → Prometheus scrape endpoint (opt-in)
//! ```
//!
//! # Design Decisions
//! - Diagnostics never enter the logger they describe
//! - Metrics are cheap (atomic increments) and no-ops without a recorder

pub mod logging;
pub mod metrics;
