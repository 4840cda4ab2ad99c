//! ModerationController - hide, unhide and delete for one post.
//!
//! Only built for viewers that pass [`can_moderate`]. A successful delete
//! marks the post deleted, then the owning feed tombstones it and refetches;
//! the post is never removed from the current page directly.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use feed_core::{
    can_moderate, ModerationAction, ModerationEvent, ModerationRequest, ModerationState,
};
use feed_types::{FeedError, PostEntity, PostId, Viewer, Visibility};

use crate::api::FeedApi;
use crate::engine::FeedHandle;
use crate::transport::Transport;

/// Per-post moderation control.
pub struct ModerationController<T: Transport> {
    api: Arc<FeedApi<T>>,
    post: PostId,
    state: Arc<Mutex<ModerationState>>,
    feed: Option<FeedHandle>,
}

impl<T: Transport> Clone for ModerationController<T> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            post: self.post,
            state: Arc::clone(&self.state),
            feed: self.feed.clone(),
        }
    }
}

impl<T: Transport> ModerationController<T> {
    /// Controller for `viewer` on `post`, or `None` when the viewer may not
    /// moderate it. `feed` is refreshed after a delete.
    pub fn for_viewer(
        api: Arc<FeedApi<T>>,
        viewer: &Viewer,
        post: &PostEntity,
        feed: Option<FeedHandle>,
    ) -> Option<Self> {
        if !can_moderate(viewer, post) {
            return None;
        }
        Some(Self {
            api,
            post: post.id,
            state: Arc::new(Mutex::new(ModerationState::new(viewer, post))),
            feed,
        })
    }

    /// Hide the post.
    pub async fn hide(&self) -> Result<(), FeedError> {
        self.run(ModerationRequest::SetVisibility(Visibility::Hide))
            .await
    }

    /// Unhide the post.
    pub async fn unhide(&self) -> Result<(), FeedError> {
        self.run(ModerationRequest::SetVisibility(Visibility::Unhide))
            .await
    }

    /// Delete the post and refresh the owning feed.
    pub async fn delete(&self) -> Result<(), FeedError> {
        self.run(ModerationRequest::Delete).await
    }

    /// Current state.
    pub async fn state(&self) -> ModerationState {
        self.state.lock().await.clone()
    }

    async fn run(&self, request: ModerationRequest) -> Result<(), FeedError> {
        {
            let mut state = self.state.lock().await;
            let (new_state, actions) = state.clone().on_event(ModerationEvent::Requested(request));
            *state = new_state;
            match actions.as_slice() {
                [ModerationAction::Send(_)] => {}
                [ModerationAction::Report { error }] => {
                    warn!(post = %self.post, ?request, %error, "Moderation refused");
                    return Err(error.clone());
                }
                _ => {
                    debug!(post = %self.post, ?request, "Moderation request ignored");
                    return Ok(());
                }
            }
        }

        let outcome = match request {
            ModerationRequest::SetVisibility(visibility) => {
                self.api.set_visibility(self.post, visibility).await
            }
            ModerationRequest::Delete => self.api.delete_post(self.post).await,
        };

        let event = match &outcome {
            Ok(()) => ModerationEvent::Completed,
            Err(error) => ModerationEvent::Failed {
                error: error.clone(),
            },
        };
        let actions = {
            let mut state = self.state.lock().await;
            let (new_state, actions) = state.clone().on_event(event);
            *state = new_state;
            actions
        };

        for action in actions {
            match action {
                ModerationAction::RefreshFeed => {
                    info!(post = %self.post, "Post deleted, refreshing feed");
                    if let Some(feed) = &self.feed {
                        if feed.post_deleted(self.post).is_err() {
                            debug!(post = %self.post, "Feed engine already stopped");
                        }
                    }
                }
                ModerationAction::Report { error } => {
                    warn!(post = %self.post, ?request, %error, "Moderation failed");
                }
                ModerationAction::Send(_) => {}
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::engine::FeedSyncEngine;
    use crate::post_view::PostView;
    use crate::transport::{Method, MockReply, MockTransport};
    use std::time::Duration;
    use feed_types::{Author, FeedSource, Role, UserId, HIDDEN_PLACEHOLDER};
    use serde_json::json;

    fn post(id: u64, author: u64) -> PostEntity {
        PostEntity {
            id: PostId::new(id),
            author: Author {
                id: UserId::new(author),
                display_name: "club".into(),
                avatar_url: String::new(),
                role: Role::Organization,
            },
            content: Some("hello".into()),
            created_at: None,
            topics: vec![],
            like_count: 0,
            liked_by: vec![],
            hidden: false,
            deleted: false,
        }
    }

    fn api(transport: &MockTransport) -> Arc<FeedApi<MockTransport>> {
        Arc::new(FeedApi::new(transport.clone(), ClientConfig::default()))
    }

    fn admin() -> Viewer {
        Viewer::new(UserId::new(1), Role::Admin)
    }

    #[test]
    fn controls_exist_only_for_moderators() {
        let transport = MockTransport::new();
        let p = post(3, 5);

        assert!(ModerationController::for_viewer(api(&transport), &admin(), &p, None).is_some());
        assert!(ModerationController::for_viewer(
            api(&transport),
            &Viewer::new(UserId::new(5), Role::Organization),
            &p,
            None
        )
        .is_some());
        assert!(ModerationController::for_viewer(
            api(&transport),
            &Viewer::new(UserId::new(6), Role::Organization),
            &p,
            None
        )
        .is_none());
        assert!(ModerationController::for_viewer(
            api(&transport),
            &Viewer::new(UserId::new(5), Role::Regular),
            &p,
            None
        )
        .is_none());
    }

    #[tokio::test]
    async fn hide_then_unhide() {
        let transport = MockTransport::new();
        transport.queue(MockReply::status(200));
        transport.queue(MockReply::raw(200, "ok"));
        let c = ModerationController::for_viewer(api(&transport), &admin(), &post(3, 5), None)
            .unwrap();

        c.hide().await.unwrap();
        let state = c.state().await;
        assert!(state.is_hidden());
        assert_eq!(state.display("hello"), HIDDEN_PLACEHOLDER);

        c.unhide().await.unwrap();
        assert!(!c.state().await.is_hidden());
        assert_eq!(
            transport.sent_targets(),
            vec!["/posts/3/?action=hide", "/posts/3/?action=unhide"]
        );
    }

    #[tokio::test]
    async fn failed_hide_is_returned_and_changes_nothing() {
        let transport = MockTransport::new();
        transport.queue(MockReply::status(403));
        let c = ModerationController::for_viewer(api(&transport), &admin(), &post(3, 5), None)
            .unwrap();

        assert_eq!(c.hide().await, Err(FeedError::ServerRejected(403)));
        let state = c.state().await;
        assert!(!state.is_hidden());
        assert!(state.in_flight().is_none());
    }

    #[tokio::test]
    async fn network_failure_on_delete_keeps_post() {
        let transport = MockTransport::new();
        transport.fail_next("reset by peer");
        let c = ModerationController::for_viewer(api(&transport), &admin(), &post(3, 5), None)
            .unwrap();

        assert!(matches!(c.delete().await, Err(FeedError::NetworkFailure(_))));
        assert!(!c.state().await.is_deleted());
    }

    #[tokio::test(start_paused = true)]
    async fn deleted_post_is_not_rebuilt_before_refetch_lands() {
        let transport = MockTransport::new();
        let posts = |ids: &[u64]| {
            let posts: Vec<_> = ids
                .iter()
                .map(|id| json!({"id": id, "author": {"id": 5}, "content": "x"}))
                .collect();
            json!({"posts": posts, "has_before": false, "has_after": false})
        };
        transport.queue_json(200, &posts(&[3, 2, 1]));
        transport.queue(MockReply::status(200));
        transport.queue(MockReply::json(200, &posts(&[3, 1])).after(Duration::from_secs(2)));

        let api = api(&transport);
        let (engine, feed) = FeedSyncEngine::new(Arc::clone(&api), FeedSource::All);
        let _engine = engine.spawn();
        feed.refresh().unwrap();
        feed.settled().await;

        let c = ModerationController::for_viewer(
            Arc::clone(&api),
            &admin(),
            &post(2, 5),
            Some(feed.clone()),
        )
        .unwrap();
        c.delete().await.unwrap();

        let mut snapshots = feed.subscribe();
        let snapshot = snapshots
            .wait_for(|s| s.page.items.iter().any(|p| p.deleted))
            .await
            .unwrap()
            .clone();
        assert!(snapshot.loading);
        assert!(snapshot.page.contains(PostId::new(2)));

        let views = PostView::for_page(&api, &admin(), &snapshot.page, Some(&feed));
        let ids: Vec<u64> = views.iter().map(|v| v.post().id.value()).collect();
        assert_eq!(ids, vec![3, 1]);

        let after = feed.settled().await;
        assert!(!after.loading);
        assert!(!after.page.contains(PostId::new(2)));
    }

    #[tokio::test]
    async fn delete_refreshes_feed_and_post_disappears() {
        let transport = MockTransport::new();
        let posts = |ids: &[u64]| {
            let posts: Vec<_> = ids
                .iter()
                .map(|id| json!({"id": id, "author": {"id": 5}, "content": "x"}))
                .collect();
            json!({"posts": posts, "has_before": false, "has_after": false})
        };
        transport.queue_json(200, &posts(&[3, 2, 1]));
        transport.queue(MockReply::status(200));
        transport.queue_json(200, &posts(&[3, 1]));

        let api = api(&transport);
        let (engine, feed) = FeedSyncEngine::new(Arc::clone(&api), FeedSource::All);
        let _engine = engine.spawn();
        feed.refresh().unwrap();
        let before = feed.settled().await;
        assert!(before.page.contains(PostId::new(2)));

        let c = ModerationController::for_viewer(api, &admin(), &post(2, 5), Some(feed.clone()))
            .unwrap();
        c.delete().await.unwrap();
        assert!(c.state().await.is_deleted());

        let after = feed.settled().await;
        assert!(!after.page.contains(PostId::new(2)));

        let requests = transport.sent_requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].method, Method::Delete);
        assert_eq!(requests[1].path, "/posts/2");
    }
}
