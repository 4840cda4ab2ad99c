//! Transport abstraction for the feed service.
//!
//! A transport moves one JSON request to the service and returns the raw
//! status and body. It knows nothing about feed semantics: status checks,
//! decoding and timeouts live in [`crate::FeedApi`].
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new();
//! transport.queue_json(200, &serde_json::json!({"likes": 3}));
//! let response = transport.send(ApiRequest::post("/posts/1/like/")).await?;
//! assert_eq!(response.status, 200);
//! ```

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::{MockReply, MockTransport};

use async_trait::async_trait;
use feed_types::FeedError;
use std::fmt;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not reach the service.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The underlying client gave up waiting.
    #[error("request timeout")]
    Timeout,

    /// Request could not be built (bad base URL, unserializable body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Anything else the HTTP client reported.
    #[error("http error: {0}")]
    Http(String),
}

impl From<TransportError> for FeedError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout => FeedError::Timeout,
            other => FeedError::NetworkFailure(other.to_string()),
        }
    }
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One request to the service, relative to the base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path, starting with `/`.
    pub path: String,
    /// Query pairs, in order. Values are not yet URL-encoded.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// GET `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// POST `path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// PUT `path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// DELETE `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append one query pair.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// `path?k=v&...`, unencoded. Used for logging and request matching.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

/// Raw response from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: u16,
    /// Body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait for talking to the feed service.
///
/// Implementations attach credentials and resolve the path against their
/// base URL. A non-2xx status is a successful send.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the raw response.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
