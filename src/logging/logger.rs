//! The shared logger handle.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::logging::{Level, LevelFilter, LogRecord};
use crate::observability::metrics;
use crate::transport::{Transport, TransportKind};

/// Cheaply clonable handle over one transport.
///
/// Every clone and every child shares the transport chosen at construction.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    filter: LevelFilter,
    /// Base fields merged with child bindings, keyed by name.
    bindings: Map<String, Value>,
    transport: Arc<dyn Transport>,
}

impl Logger {
    pub fn new(filter: LevelFilter, base: Map<String, Value>, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                filter,
                bindings: base,
                transport,
            }),
        }
    }

    /// Create a logger that adds `bindings` to every record.
    ///
    /// Bindings override base fields of the same name.
    pub fn child(&self, bindings: Value) -> Logger {
        let mut merged = self.inner.bindings.clone();
        merge_fields(&mut merged, bindings);

        Self {
            inner: Arc::new(Inner {
                filter: self.inner.filter,
                bindings: merged,
                transport: Arc::clone(&self.inner.transport),
            }),
        }
    }

    pub fn filter(&self) -> LevelFilter {
        self.inner.filter
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.inner.filter.enabled(level)
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.inner.transport.kind()
    }

    /// Fields attached to every record from this logger.
    pub fn bindings(&self) -> &Map<String, Value> {
        &self.inner.bindings
    }

    /// Submit a record.
    ///
    /// `fields` is usually a JSON object whose entries override bindings of
    /// the same name. Any other value is attached under the `data` key.
    /// Returns without waiting for delivery.
    pub fn log(&self, level: Level, msg: impl Into<String>, fields: Value) {
        if !self.is_enabled(level) {
            metrics::record_suppressed(level);
            return;
        }

        let mut merged = self.inner.bindings.clone();
        merge_fields(&mut merged, fields);

        metrics::record_emitted(level);
        self.inner.transport.write(LogRecord::new(level, msg, merged));
    }

    pub fn trace(&self, msg: impl Into<String>) {
        self.log(Level::Trace, msg, Value::Null);
    }

    pub fn debug(&self, msg: impl Into<String>) {
        self.log(Level::Debug, msg, Value::Null);
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.log(Level::Info, msg, Value::Null);
    }

    pub fn warn(&self, msg: impl Into<String>) {
        self.log(Level::Warn, msg, Value::Null);
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.log(Level::Error, msg, Value::Null);
    }

    pub fn fatal(&self, msg: impl Into<String>) {
        self.log(Level::Fatal, msg, Value::Null);
    }

    pub fn trace_with(&self, msg: impl Into<String>, fields: Value) {
        self.log(Level::Trace, msg, fields);
    }

    pub fn debug_with(&self, msg: impl Into<String>, fields: Value) {
        self.log(Level::Debug, msg, fields);
    }

    pub fn info_with(&self, msg: impl Into<String>, fields: Value) {
        self.log(Level::Info, msg, fields);
    }

    pub fn warn_with(&self, msg: impl Into<String>, fields: Value) {
        self.log(Level::Warn, msg, fields);
    }

    pub fn error_with(&self, msg: impl Into<String>, fields: Value) {
        self.log(Level::Error, msg, fields);
    }

    pub fn fatal_with(&self, msg: impl Into<String>, fields: Value) {
        self.log(Level::Fatal, msg, fields);
    }

    /// Wait until everything submitted so far has been handed to the sink.
    pub async fn flush(&self) {
        self.inner.transport.flush().await;
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("filter", &self.inner.filter)
            .field("bindings", &self.inner.bindings)
            .field("transport", &self.inner.transport)
            .finish()
    }
}

fn merge_fields(target: &mut Map<String, Value>, fields: Value) {
    match fields {
        Value::Null => {}
        Value::Object(map) => target.extend(map),
        other => {
            target.insert("data".to_string(), other);
        }
    }
}
