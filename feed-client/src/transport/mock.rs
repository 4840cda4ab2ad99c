//! Mock transport for testing.
//!
//! Replies are queued ahead of time and handed out in send order, unless a
//! reply was queued for a specific request target. Replies can be delayed
//! to stage out-of-order resolution.

use super::{ApiRequest, ApiResponse, Transport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A canned reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockReply {
    /// Response to return.
    pub response: ApiResponse,
    /// How long `send` waits before returning it.
    pub delay: Option<Duration>,
}

impl MockReply {
    /// Reply with a JSON body.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            response: ApiResponse {
                status,
                body: body.to_string().into_bytes(),
            },
            delay: None,
        }
    }

    /// Reply with a status and an empty body.
    pub fn status(status: u16) -> Self {
        Self {
            response: ApiResponse {
                status,
                body: Vec::new(),
            },
            delay: None,
        }
    }

    /// Reply with raw body bytes.
    pub fn raw(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            response: ApiResponse {
                status,
                body: body.into(),
            },
            delay: None,
        }
    }

    /// Hold the reply back for `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Mock transport for testing.
///
/// Clones share state, so a test can keep one handle while the code under
/// test owns another.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    sent: Vec<ApiRequest>,
    queue: VecDeque<MockReply>,
    routed: Vec<(String, MockReply)>,
    fail_next: Option<String>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next request without a routed reply.
    pub fn queue(&self, reply: MockReply) {
        let mut inner = self.inner.lock().unwrap();
        inner.queue.push_back(reply);
    }

    /// Queue a JSON reply.
    pub fn queue_json(&self, status: u16, body: &serde_json::Value) {
        self.queue(MockReply::json(status, body));
    }

    /// Queue a reply for the first request whose target contains `needle`.
    ///
    /// Routed replies take precedence over the plain queue.
    pub fn queue_for(&self, needle: &str, reply: MockReply) {
        let mut inner = self.inner.lock().unwrap();
        inner.routed.push((needle.to_string(), reply));
    }

    /// Cause the next send to fail with a connection error.
    pub fn fail_next(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next = Some(error.to_string());
    }

    /// Every request sent so far, in order.
    pub fn sent_requests(&self) -> Vec<ApiRequest> {
        let inner = self.inner.lock().unwrap();
        inner.sent.clone()
    }

    /// Targets (`path?query`) of every request sent so far.
    pub fn sent_targets(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.sent.iter().map(ApiRequest::target).collect()
    }

    /// The last request sent.
    pub fn last_sent(&self) -> Option<ApiRequest> {
        let inner = self.inner.lock().unwrap();
        inner.sent.last().cloned()
    }

    /// Clear all state.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockTransportInner::default();
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let reply = {
            let mut inner = self.inner.lock().unwrap();
            let target = request.target();
            inner.sent.push(request);

            // Check for forced failure
            if let Some(error) = inner.fail_next.take() {
                return Err(TransportError::ConnectionFailed(error));
            }

            match inner
                .routed
                .iter()
                .position(|(needle, _)| target.contains(needle.as_str()))
            {
                Some(index) => Some(inner.routed.remove(index).1),
                None => inner.queue.pop_front(),
            }
        };

        let reply = reply
            .ok_or_else(|| TransportError::ConnectionFailed("no reply queued".to_string()))?;
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(reply.response)
    }
}
