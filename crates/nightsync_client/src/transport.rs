//! Transport layer abstraction for sync operations.

use crate::request::Request;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The remote answered with a non-2xx status.
    #[error("bad status code {0}")]
    BadStatusCode(u16),
    /// Connectivity failure.
    #[error("network error: {0}")]
    Network(String),
    /// The request URL could not be used.
    #[error("missing url")]
    MissingUrl,
}

/// A transport carries one request to the remote store.
///
/// This trait abstracts the network layer. It owns connection reuse and
/// TLS; retries, filtering and authentication live in the client above it.
pub trait Transport: Send + Sync {
    /// Sends a request and returns the response body of a 2xx answer.
    fn send(&self, request: Request)
        -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send {
        (**self).send(request)
    }
}

/// A scripted transport for testing.
///
/// Responses are served first-in first-out; once the queue is empty the
/// fallback response (if any) is returned. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    fallback: Mutex<Option<Result<Vec<u8>, TransportError>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    /// Creates a new mock transport with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw response.
    pub fn push_response(&self, response: Result<Vec<u8>, TransportError>) {
        self.responses.lock().push_back(response);
    }

    /// Queues a JSON response body.
    pub fn push_json<T: Serialize + ?Sized>(&self, body: &T) {
        let bytes = serde_json::to_vec(body).unwrap_or_default();
        self.push_response(Ok(bytes));
    }

    /// Queues a failure.
    pub fn push_error(&self, error: TransportError) {
        self.push_response(Err(error));
    }

    /// Sets the response returned once the queue is drained.
    pub fn set_fallback(&self, response: Result<Vec<u8>, TransportError>) {
        *self.fallback.lock() = Some(response);
    }

    /// Returns every request sent so far.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests sent so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<Request> {
        self.requests.lock().last().cloned()
    }

    fn next_response(&self) -> Result<Vec<u8>, TransportError> {
        if let Some(response) = self.responses.lock().pop_front() {
            return response;
        }
        self.fallback
            .lock()
            .clone()
            .unwrap_or_else(|| Err(TransportError::Network("no mock response set".into())))
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().push(request);
        self.next_response()
    }
}
