//! HTTP transport implementation.
//!
//! `reqwest`-backed [`Transport`]. Connection pooling and TLS are left to
//! `reqwest`; the client above decides what to send and how often.

use crate::error::{SyncError, SyncResult};
use crate::request::{Method, Request};
use crate::transport::{Transport, TransportError};
use tracing::trace;

/// HTTP transport over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a default connection pool.
    pub fn new() -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("nightsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::transport_fatal(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Vec<u8>, TransportError> {
        // reqwest has no notion of constrained network paths; the flag is
        // honored by platform transports that do.
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.url)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                TransportError::MissingUrl
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        trace!(status = status.as_u16(), "nightscout response");
        if !status.is_success() {
            return Err(TransportError::BadStatusCode(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(body.to_vec())
    }
}
