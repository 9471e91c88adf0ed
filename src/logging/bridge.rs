//! Forwarding `tracing` events into a [`Logger`].
//!
//! Installing [`LoggerLayer`] on the global subscriber lets code that uses the
//! `tracing` macros reach the same transport as direct `Logger` calls.

use std::fmt;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::logging::{Level, Logger};

/// Target prefix of this crate's own diagnostics.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Crates under the Loki HTTP sink. Their events are produced by pushes.
const SINK_CLIENT_TARGETS: [&str; 6] = ["reqwest", "hyper", "hyper_util", "h2", "tower", "rustls"];

/// Field carrying the original target of a `log` record bridged into `tracing`.
const LOG_TARGET_FIELD: &str = "log.target";

/// A `tracing_subscriber` layer that re-emits events through a `Logger`.
///
/// Events from this crate and from the sink's HTTP client are skipped so
/// transport activity never loops back into the transport.
#[derive(Debug, Clone)]
pub struct LoggerLayer {
    logger: Logger,
}

impl LoggerLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for LoggerLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_excluded(metadata.target()) {
            return;
        }

        let level = Level::from(metadata.level());
        if !self.logger.is_enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let target = visitor
            .log_target
            .take()
            .unwrap_or_else(|| metadata.target().to_string());
        if is_excluded(&target) {
            return;
        }
        visitor.fields.insert("target".to_string(), Value::from(target));

        self.logger
            .log(level, visitor.message.unwrap_or_default(), Value::Object(visitor.fields));
    }
}

fn is_excluded(target: &str) -> bool {
    has_prefix(target, OWN_TARGET)
        || SINK_CLIENT_TARGETS
            .iter()
            .any(|prefix| has_prefix(target, prefix))
}

/// `target` is `prefix` itself or one of its modules.
fn has_prefix(target: &str, prefix: &str) -> bool {
    match target.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    log_target: Option<String>,
    fields: Map<String, Value>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        let name = field.name();
        if name == "message" {
            self.message = Some(into_text(value));
        } else if name == LOG_TARGET_FIELD {
            self.log_target = Some(into_text(value));
        } else if !name.starts_with("log.") {
            self.fields.insert(name.to_string(), value);
        }
    }
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::from(format!("{:?}", value)));
    }
}
