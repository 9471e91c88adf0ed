//! Metrics collection and exposition.
//!
//! # Metrics
//! - `logger_records_total` (counter): records forwarded to the transport, by level
//! - `logger_records_suppressed_total` (counter): records below the minimum level, by level
//! - `logger_batches_pushed_total` (counter): successful Loki pushes
//! - `logger_lines_pushed_total` (counter): lines delivered to Loki
//! - `logger_push_failures_total` (counter): failed Loki pushes
//! - `logger_records_dropped_total` (counter): records lost to failures or shutdown
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - The Prometheus exporter is opt-in from the binary

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::logging::Level;

pub fn record_emitted(level: Level) {
    ::metrics::counter!("logger_records_total", "level" => level.as_str()).increment(1);
}

pub fn record_suppressed(level: Level) {
    ::metrics::counter!("logger_records_suppressed_total", "level" => level.as_str()).increment(1);
}

pub fn record_batch_pushed(lines: usize) {
    ::metrics::counter!("logger_batches_pushed_total").increment(1);
    ::metrics::counter!("logger_lines_pushed_total").increment(lines as u64);
}

pub fn record_push_failure() {
    ::metrics::counter!("logger_push_failures_total").increment(1);
}

pub fn record_dropped(records: usize) {
    ::metrics::counter!("logger_records_dropped_total").increment(records as u64);
}

/// Install the Prometheus exporter with an HTTP scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe();
            tracing::info!(address = %addr, "Metrics endpoint started");
        }
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

fn describe() {
    ::metrics::describe_counter!("logger_records_total", "Records forwarded to the transport");
    ::metrics::describe_counter!(
        "logger_records_suppressed_total",
        "Records below the minimum level"
    );
    ::metrics::describe_counter!("logger_batches_pushed_total", "Successful Loki pushes");
    ::metrics::describe_counter!("logger_lines_pushed_total", "Lines delivered to Loki");
    ::metrics::describe_counter!("logger_push_failures_total", "Failed Loki pushes");
    ::metrics::describe_counter!(
        "logger_records_dropped_total",
        "Records lost to push failures or shutdown"
    );
}
