//! Client configuration.

use std::num::NonZeroU32;
use std::time::Duration;

use feed_types::DEFAULT_PAGE_SIZE;

/// Default service address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3030";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for talking to the feed service.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every path is resolved against.
    pub base_url: String,
    /// Value of the `Cookie` header attached to every request.
    pub session_cookie: Option<String>,
    /// Posts per page.
    pub page_size: NonZeroU32,
    /// Upper bound on one request, connect to last byte.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Configuration for the service at `base_url`, other fields default.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Set the session cookie.
    pub fn with_session_cookie(mut self, cookie: &str) -> Self {
        self.session_cookie = Some(cookie.to_string());
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: NonZeroU32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .field("page_size", &self.page_size)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3030");
        assert!(config.session_cookie.is_none());
        assert_eq!(config.page_size.get(), 10);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new("https://feed.example.org")
            .with_session_cookie("session=abc")
            .with_page_size(NonZeroU32::new(25).unwrap())
            .with_request_timeout(Duration::from_secs(3));

        assert_eq!(config.base_url, "https://feed.example.org");
        assert_eq!(config.session_cookie.as_deref(), Some("session=abc"));
        assert_eq!(config.page_size.get(), 25);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn debug_redacts_cookie() {
        let config = ClientConfig::default().with_session_cookie("session=secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("REDACTED"));
    }
}
