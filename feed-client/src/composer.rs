//! PostComposer - turns typed text into a new post.

use std::sync::Arc;

use tracing::{debug, info, warn};

use feed_core::Draft;
use feed_types::{FeedError, PostId, Viewer};

use crate::api::FeedApi;
use crate::engine::FeedHandle;
use crate::transport::Transport;

/// Compose box for the current viewer.
pub struct PostComposer<T: Transport> {
    api: Arc<FeedApi<T>>,
    viewer: Viewer,
    feed: Option<FeedHandle>,
    input: String,
}

impl<T: Transport> PostComposer<T> {
    /// Composer posting as `viewer`. `feed` is told about every created post.
    pub fn new(api: Arc<FeedApi<T>>, viewer: Viewer, feed: Option<FeedHandle>) -> Self {
        Self {
            api,
            viewer,
            feed,
            input: String::new(),
        }
    }

    /// Replace the input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Current input text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Submit the current input.
    ///
    /// Blank input fails with [`FeedError::EmptyPost`] without a request and
    /// is kept. Once a request is made the input is cleared, whatever the
    /// outcome.
    pub async fn submit(&mut self) -> Result<PostId, FeedError> {
        let draft = Draft::parse(&self.input)?;
        self.input.clear();

        let topics = draft.topics.len();
        match self.api.create_post(self.viewer.id, draft).await {
            Ok(post) => {
                info!(post = %post.id, topics, "Post created");
                if let Some(feed) = &self.feed {
                    if feed.post_created(post.id).is_err() {
                        debug!(post = %post.id, "Feed engine already stopped");
                    }
                }
                Ok(post.id)
            }
            Err(error) => {
                warn!(%error, "Post submission failed");
                Err(error)
            }
        }
    }
}
