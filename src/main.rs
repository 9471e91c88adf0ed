//! Web backend logger bootstrap.
//!
//! # Startup
//!
//! ```text
//!   APP_ENV, LOKI_URL, LOG_LEVEL, LOGGER_CONFIG
//!        │
//!        ▼
//!   ┌──────────────┐     ┌──────────────┐     ┌──────────────────────┐
//!   │ LoggerConfig │────▶│LoggerFactory │────▶│ Logger               │
//!   └──────────────┘     └──────────────┘     │  ├─ ConsoleTransport │ (development)
//!                                             │  └─ LokiTransport    │ (production)
//!                                             └──────────┬───────────┘
//!                                                        │ cloned into components
//!                                                        ▼
//!                                             tracing events ─▶ LoggerLayer
//! ```
//!
//! The logger is built once here and handed down explicitly; nothing looks
//! it up through a global.

use std::net::SocketAddr;

use serde_json::json;

use backend_logger::observability;
use backend_logger::{Logger, LoggerFactory};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Diagnostics emitted while the logger is being built go to stderr.
    let logger = tracing::subscriber::with_default(observability::logging::bootstrap(), || {
        LoggerFactory::from_env()?.build()
    })?;

    observability::logging::init(&logger)?;

    if let Ok(metrics_address) = std::env::var("LOGGER_METRICS_ADDR") {
        match metrics_address.parse::<SocketAddr>() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    run(logger.child(json!({ "module": "server" }))).await;

    logger.info("shutting down");
    logger.flush().await;
    Ok(())
}

async fn run(logger: Logger) {
    logger.info_with(
        "started",
        json!({
            "pid": std::process::id(),
            "transport": format!("{:?}", logger.transport_kind()),
        }),
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        logger.error_with("failed to listen for shutdown signal", json!({ "error": e.to_string() }));
    }
}
