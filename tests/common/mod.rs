//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

/// One request received by the mock Loki server.
#[derive(Debug, Clone)]
pub struct ReceivedPush {
    pub at: Instant,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Handle to a running mock Loki push endpoint.
#[derive(Clone)]
pub struct MockLoki {
    pub addr: SocketAddr,
    pushes: Arc<Mutex<Vec<ReceivedPush>>>,
}

impl MockLoki {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn pushes(&self) -> Vec<ReceivedPush> {
        self.pushes.lock().unwrap().clone()
    }

    /// Poll until `count` pushes arrived or `timeout` elapsed.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<ReceivedPush> {
        let deadline = Instant::now() + timeout;
        loop {
            let pushes = self.pushes();
            if pushes.len() >= count || Instant::now() >= deadline {
                return pushes;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

#[derive(Clone)]
struct MockState {
    pushes: Arc<Mutex<Vec<ReceivedPush>>>,
    status: StatusCode,
}

/// Start a mock Loki server on an ephemeral port that answers every push
/// with `status`.
pub async fn start_mock_loki(status: StatusCode) -> MockLoki {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let pushes = Arc::new(Mutex::new(Vec::new()));

    let state = MockState {
        pushes: pushes.clone(),
        status,
    };
    let app = Router::new()
        .route("/loki/api/v1/push", post(receive_push))
        .with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockLoki { addr, pushes }
}

async fn receive_push(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    state.pushes.lock().unwrap().push(ReceivedPush {
        at: Instant::now(),
        headers,
        body,
    });
    state.status
}

/// A writer that keeps everything written to it.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
