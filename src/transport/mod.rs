//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! Logger::log
//!     → Transport::write(LogRecord)
//!         ├─ console.rs  render line → stdout (development)
//!         └─ loki/       enqueue → batch task → POST /loki/api/v1/push (production)
//! ```
//!
//! # Design Decisions
//! - One transport per logger, fixed at construction
//! - `write` never blocks on the network; Loki delivery happens on a
//!   background task that owns its buffer
//! - Delivery failures are diagnostics, never surfaced to callers

use std::fmt;

use futures_util::future::BoxFuture;

use crate::logging::LogRecord;

pub mod console;
pub mod loki;
pub mod memory;

pub use console::ConsoleTransport;
pub use loki::{HttpSink, LokiSink, LokiTransport, PushRequest, SinkError};
pub use memory::MemoryTransport;

/// Which delivery backend a transport is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Console,
    Loki,
    Memory,
}

/// Accepts structured records and delivers them somewhere.
pub trait Transport: Send + Sync + fmt::Debug {
    fn kind(&self) -> TransportKind;

    /// Accept a record. Must return promptly.
    fn write(&self, record: LogRecord);

    /// Resolve once every record written so far has been delivered or dropped.
    fn flush(&self) -> BoxFuture<'_, ()>;
}
