//! Process-wide subscriber setup.
//!
//! # Responsibilities
//! - Route this crate's own diagnostics to stderr through a `fmt` layer
//! - Route every other `tracing` event into the application `Logger`
//!
//! # Design Decisions
//! - Diagnostics are filtered by `RUST_LOG` (default `backend_logger=info`)
//! - The logger layer applies the logger's own minimum level
//! - `bootstrap` covers startup, before a `Logger` exists to forward into
//! - Installed once from `main`; libraries never call this

use tracing::Subscriber;
use tracing_subscriber::filter::{filter_fn, EnvFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::Layer;

use crate::logging::{Logger, LoggerLayer};

const DEFAULT_DIAGNOSTICS: &str = "backend_logger=info";

fn diagnostics_layer<S>() -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIAGNOSTICS));

    tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter)
        .with_filter(filter_fn(|metadata| {
            metadata.target().starts_with(env!("CARGO_CRATE_NAME"))
        }))
}

/// Diagnostics-only subscriber for configuration and logger construction.
///
/// Meant for `tracing::subscriber::with_default` around `LoggerFactory`
/// calls made before `init`.
pub fn bootstrap() -> impl Subscriber + Send + Sync {
    tracing_subscriber::registry().with(diagnostics_layer())
}

/// Install the global subscriber.
pub fn init(logger: &Logger) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(diagnostics_layer())
        .with(LoggerLayer::new(logger.clone()))
        .try_init()
}
