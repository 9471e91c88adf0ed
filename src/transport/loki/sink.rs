//! Delivery of push requests to Loki.

use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::{BasicAuth, RemoteConfig};
use crate::transport::loki::push::{PushRequest, PUSH_PATH};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Loki rejected push with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid header `{0}`")]
    InvalidHeader(String),
}

/// Receives finished batches. Implemented over HTTP for production and by
/// in-memory fakes in tests.
pub trait LokiSink: Send + Sync + 'static {
    fn push(&self, request: PushRequest) -> BoxFuture<'_, Result<(), SinkError>>;
}

/// Pushes batches to a Loki HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
    basic_auth: Option<BasicAuth>,
}

impl HttpSink {
    pub fn new(config: &RemoteConfig) -> Result<Self, SinkError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| SinkError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| SinkError::InvalidHeader(name.as_str().to_string()))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: push_endpoint(&config.address),
            basic_auth: config.basic_auth.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LokiSink for HttpSink {
    fn push(&self, request: PushRequest) -> BoxFuture<'_, Result<(), SinkError>> {
        async move {
            let mut builder = self.client.post(&self.endpoint).json(&request);
            if let Some(auth) = &self.basic_auth {
                builder = builder.basic_auth(&auth.username, Some(&auth.password));
            }

            let response = builder.send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(());
            }

            let body = response.text().await.unwrap_or_default();
            Err(SinkError::Status {
                status: status.as_u16(),
                body,
            })
        }
        .boxed()
    }
}

/// `http://loki:3100/` → `http://loki:3100/loki/api/v1/push`.
pub fn push_endpoint(address: &str) -> String {
    format!("{}{}", address.trim_end_matches('/'), PUSH_PATH)
}
