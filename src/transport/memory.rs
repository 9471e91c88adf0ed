//! In-process transport that keeps records in memory.
//!
//! Used by tests and by embedders that want to inspect what a logger emits.

use std::sync::{Arc, Mutex};

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;

use crate::logging::LogRecord;
use crate::transport::{Transport, TransportKind};

#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record written so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().expect("memory transport mutex poisoned").clone()
    }
}

impl Transport for MemoryTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Memory
    }

    fn write(&self, record: LogRecord) {
        self.records
            .lock()
            .expect("memory transport mutex poisoned")
            .push(record);
    }

    fn flush(&self) -> BoxFuture<'_, ()> {
        future::ready(()).boxed()
    }
}
