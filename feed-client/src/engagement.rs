//! EngagementController - like/unlike for one post.
//!
//! Wraps the pure [`EngagementState`] in a lock so concurrent toggles
//! from the same view collapse into one request.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use feed_core::{EngagementAction, EngagementEvent, EngagementState};
use feed_types::{FeedError, PostEntity, PostId, UserId};

use crate::api::FeedApi;
use crate::transport::Transport;

/// Per-post like control.
pub struct EngagementController<T: Transport> {
    api: Arc<FeedApi<T>>,
    post: PostId,
    state: Arc<Mutex<EngagementState>>,
}

impl<T: Transport> Clone for EngagementController<T> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            post: self.post,
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Transport> EngagementController<T> {
    /// Controller for `viewer` looking at `post`.
    pub fn new(api: Arc<FeedApi<T>>, viewer: UserId, post: &PostEntity) -> Self {
        Self {
            api,
            post: post.id,
            state: Arc::new(Mutex::new(EngagementState::new(viewer, post))),
        }
    }

    /// Like if not liked, unlike if liked.
    ///
    /// Does nothing while a request is outstanding or after a failure has
    /// disabled the control. A failure is returned once and latches.
    pub async fn toggle_like(&self) -> Result<(), FeedError> {
        let action = {
            let mut state = self.state.lock().await;
            let (new_state, actions) = state.clone().on_event(EngagementEvent::ToggleRequested);
            *state = new_state;
            match actions.as_slice() {
                [EngagementAction::Send(action)] => *action,
                _ => {
                    debug!(post = %self.post, "Like toggle ignored");
                    return Ok(());
                }
            }
        };

        let outcome = self.api.set_like(self.post, action).await;

        let event = match &outcome {
            Ok(likes) => EngagementEvent::Confirmed { likes: *likes },
            Err(error) => EngagementEvent::Failed {
                error: error.clone(),
            },
        };
        let mut state = self.state.lock().await;
        let (new_state, actions) = state.clone().on_event(event);
        *state = new_state;

        for effect in actions {
            if let EngagementAction::Disabled { error } = effect {
                warn!(post = %self.post, like = action.as_str(), %error, "Like failed, control disabled");
            }
        }
        outcome.map(|_| ())
    }

    /// Resync from a freshly fetched copy of the post.
    pub async fn sync(&self, post: &PostEntity) {
        let mut state = self.state.lock().await;
        let (new_state, _) = state.clone().on_event(EngagementEvent::EntityRefreshed {
            liked_by: post.liked_by.clone(),
            like_count: post.like_count,
        });
        *state = new_state;
    }

    /// Current state.
    pub async fn state(&self) -> EngagementState {
        self.state.lock().await.clone()
    }
}
