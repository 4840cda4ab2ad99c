//! # feed-client
//!
//! Async client for the Torospace feed.
//!
//! ## Features
//!
//! - **Sync engine**: channel-driven page fetching with stale-response filtering
//! - **Per-post controls**: like/unlike, hide/unhide/delete, gated by role
//! - **Composer**: hashtag topics, local blank check, spam rejection
//! - **Transport abstraction**: reqwest over HTTP, or a mock for tests
//!
//! Protocol decisions live in `feed-core`; this crate runs them against the
//! service.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use feed_client::{ClientConfig, FeedApi, FeedSyncEngine, HttpTransport};
//! use feed_types::FeedSource;
//!
//! let config = ClientConfig::new("https://feed.example.org").with_session_cookie("session=...");
//! let api = Arc::new(FeedApi::new(HttpTransport::new(&config)?, config));
//! let (engine, feed) = FeedSyncEngine::new(api, FeedSource::All);
//! engine.spawn();
//!
//! feed.search("careers")?;
//! let snapshot = feed.settled().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod composer;
pub mod config;
pub mod engagement;
pub mod engine;
pub mod moderation;
pub mod post_view;
pub mod transport;

pub use api::{FeedApi, SPAM_REJECTED_STATUS};
pub use composer::PostComposer;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use engagement::EngagementController;
pub use engine::{EngineStopped, FeedHandle, FeedSyncEngine};
pub use moderation::ModerationController;
pub use post_view::PostView;
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Method, MockReply, MockTransport, Transport,
    TransportError,
};
