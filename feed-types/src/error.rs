//! Error types for the feed client.

use thiserror::Error;

/// Errors that can occur talking to the feed service.
///
/// Variants carry strings rather than source errors so the value can be
/// cloned into state snapshots and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The request never produced a response (connect, DNS, TLS, reset).
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// No response within the configured request timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("server rejected request with status {0}")]
    ServerRejected(u16),

    /// The server refused a new post as spam (406 on submission).
    #[error("content rejected as spam")]
    ContentRejectedAsSpam,

    /// The response body was not the JSON shape we expected.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The composer was asked to submit an empty post.
    #[error("post is empty")]
    EmptyPost,

    /// The viewer lacks the role required for a moderation action.
    #[error("not permitted")]
    NotPermitted,
}

impl FeedError {
    /// Whether the failure happened below the HTTP status layer.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkFailure(_) | Self::Timeout)
    }
}
