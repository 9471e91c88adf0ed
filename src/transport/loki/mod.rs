//! Batching Loki transport for production.
//!
//! # Responsibilities
//! - Accept records without blocking the caller
//! - Buffer them on a background task
//! - Push the buffer to Loki once per flush interval
//!
//! # Design Decisions
//! - First push happens one full interval after start, and pushes are never
//!   closer together than the interval (`MissedTickBehavior::Delay`)
//! - A failed push is logged as a diagnostic and the batch is dropped; no retry
//! - Dropping every handle drains the buffer one last time

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::RemoteConfig;
use crate::logging::LogRecord;
use crate::observability::metrics;
use crate::transport::{Transport, TransportKind};

pub mod push;
pub mod sink;

pub use push::{PushRequest, Stream};
pub use sink::{HttpSink, LokiSink, SinkError};

enum Command {
    Record(LogRecord),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background batching task.
pub struct LokiTransport {
    tx: mpsc::UnboundedSender<Command>,
    flush_interval: Duration,
    labels: BTreeMap<String, String>,
}

impl LokiTransport {
    /// Start the batching task on `handle`.
    pub fn spawn<K: LokiSink>(handle: &Handle, config: &RemoteConfig, sink: K) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let flush_interval = Duration::from_secs(config.flush_interval_secs);

        let batcher = Batcher {
            rx,
            sink,
            labels: config.labels.clone(),
            period: flush_interval,
            buffer: Vec::new(),
        };
        handle.spawn(batcher.run());

        tracing::info!(
            address = %config.address,
            flush_interval_secs = config.flush_interval_secs,
            "Loki transport started"
        );

        Self {
            tx,
            flush_interval,
            labels: config.labels.clone(),
        }
    }

    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }
}

impl Transport for LokiTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Loki
    }

    fn write(&self, record: LogRecord) {
        if self.tx.send(Command::Record(record)).is_err() {
            metrics::record_dropped(1);
        }
    }

    fn flush(&self) -> BoxFuture<'_, ()> {
        let (ack, done) = oneshot::channel();
        let sent = self.tx.send(Command::Flush(ack)).is_ok();
        async move {
            if sent {
                let _ = done.await;
            }
        }
        .boxed()
    }
}

impl fmt::Debug for LokiTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LokiTransport")
            .field("flush_interval", &self.flush_interval)
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

struct Batcher<K> {
    rx: mpsc::UnboundedReceiver<Command>,
    sink: K,
    labels: BTreeMap<String, String>,
    period: Duration,
    buffer: Vec<LogRecord>,
}

impl<K: LokiSink> Batcher<K> {
    async fn run(mut self) {
        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.push_buffered().await;
                }
                command = self.rx.recv() => match command {
                    Some(Command::Record(record)) => self.buffer.push(record),
                    Some(Command::Flush(ack)) => {
                        self.push_buffered().await;
                        ticker.reset();
                        let _ = ack.send(());
                    }
                    None => {
                        self.push_buffered().await;
                        break;
                    }
                }
            }
        }

        tracing::debug!("Loki transport stopped");
    }

    async fn push_buffered(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let records = std::mem::take(&mut self.buffer);
        let (request, skipped) = PushRequest::from_records(&self.labels, &records);
        if skipped > 0 {
            metrics::record_dropped(skipped);
        }
        if request.is_empty() {
            return;
        }

        let lines = request.line_count();
        match self.sink.push(request).await {
            Ok(()) => {
                tracing::debug!(lines, "Pushed batch to Loki");
                metrics::record_batch_pushed(lines);
            }
            Err(e) => {
                tracing::error!(error = %e, lines, "Loki push failed, batch dropped");
                metrics::record_push_failure();
                metrics::record_dropped(lines);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Level;
    use futures_util::future;
    use serde_json::Map;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingSink {
        pushes: Arc<Mutex<Vec<(Instant, PushRequest)>>>,
        fail: bool,
    }

    impl RecordingSink {
        fn pushes(&self) -> Vec<(Instant, PushRequest)> {
            self.pushes.lock().unwrap().clone()
        }
    }

    impl LokiSink for RecordingSink {
        fn push(&self, request: PushRequest) -> BoxFuture<'_, Result<(), SinkError>> {
            self.pushes.lock().unwrap().push((Instant::now(), request));
            let result = if self.fail {
                Err(SinkError::Status { status: 500, body: "down".into() })
            } else {
                Ok(())
            };
            future::ready(result).boxed()
        }
    }

    fn record(msg: &str) -> LogRecord {
        LogRecord::new(Level::Info, msg, Map::new())
    }

    fn transport(sink: RecordingSink) -> LokiTransport {
        LokiTransport::spawn(&Handle::current(), &RemoteConfig::default(), sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_released_after_flush_interval() {
        let sink = RecordingSink::default();
        let start = Instant::now();
        let transport = transport(sink.clone());

        transport.write(record("a"));
        transport.write(record("b"));
        transport.write(record("c"));

        time::sleep(Duration::from_millis(4_900)).await;
        assert!(sink.pushes().is_empty(), "nothing may be released before the interval");

        time::sleep(Duration::from_millis(200)).await;
        let pushes = sink.pushes();
        assert_eq!(pushes.len(), 1);
        assert!(pushes[0].0 - start >= Duration::from_secs(5));
        assert_eq!(pushes[0].1.line_count(), 3);
        assert_eq!(pushes[0].1.streams[0].stream["app"], "web-app");
    }

    #[tokio::test(start_paused = true)]
    async fn test_settings_taken_from_config() {
        let mut config = RemoteConfig::default();
        config.flush_interval_secs = 2;
        config.labels.insert("env".into(), "staging".into());
        let transport = LokiTransport::spawn(&Handle::current(), &config, RecordingSink::default());

        assert_eq!(transport.flush_interval(), Duration::from_secs(2));
        assert_eq!(transport.labels()["app"], "web-app");
        assert_eq!(transport.labels()["env"], "staging");
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_batches_spaced_by_interval() {
        let sink = RecordingSink::default();
        let transport = transport(sink.clone());

        for i in 0..4 {
            transport.write(record(&format!("record {}", i)));
            time::sleep(Duration::from_millis(2_600)).await;
        }
        time::sleep(Duration::from_secs(6)).await;

        let pushes = sink.pushes();
        assert!(pushes.len() >= 2);
        assert_eq!(pushes.iter().map(|(_, r)| r.line_count()).sum::<usize>(), 4);
        for pair in pushes.windows(2) {
            assert!(pair[1].0 - pair[0].0 >= Duration::from_secs(5));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_ticks_push_nothing() {
        let sink = RecordingSink::default();
        let _transport = transport(sink.clone());

        time::sleep(Duration::from_secs(30)).await;
        assert!(sink.pushes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_flush_pushes_immediately() {
        let sink = RecordingSink::default();
        let start = Instant::now();
        let transport = transport(sink.clone());

        transport.write(record("now"));
        transport.flush().await;

        let pushes = sink.pushes();
        assert_eq!(pushes.len(), 1);
        assert!(pushes[0].0 - start < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_drains_buffer() {
        let sink = RecordingSink::default();
        let transport = transport(sink.clone());

        transport.write(record("last words"));
        drop(transport);
        time::sleep(Duration::from_millis(10)).await;

        assert_eq!(sink.pushes().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_push_is_not_retried() {
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let transport = transport(sink.clone());

        transport.write(record("lost"));
        time::sleep(Duration::from_secs(16)).await;

        assert_eq!(sink.pushes().len(), 1);
    }
}
