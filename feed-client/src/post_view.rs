//! PostView - one post as the viewer sees it.
//!
//! Bundles the rendered body with the post's engagement control and, for
//! viewers allowed to moderate it, its moderation control.

use std::sync::Arc;

use feed_core::{render, Segment};
use feed_types::{FeedPage, PostEntity, Viewer, HIDDEN_PLACEHOLDER};

use crate::api::FeedApi;
use crate::engagement::EngagementController;
use crate::engine::FeedHandle;
use crate::moderation::ModerationController;
use crate::transport::Transport;

/// A rendered post with its controls attached.
pub struct PostView<T: Transport> {
    post: PostEntity,
    segments: Vec<Segment>,
    engagement: EngagementController<T>,
    moderation: Option<ModerationController<T>>,
}

impl<T: Transport> PostView<T> {
    /// Build the view of `post` for `viewer`. `feed` is refreshed after a
    /// delete from this view.
    pub fn new(
        api: Arc<FeedApi<T>>,
        viewer: &Viewer,
        post: PostEntity,
        feed: Option<FeedHandle>,
    ) -> Self {
        let segments = render(post.body());
        let engagement = EngagementController::new(Arc::clone(&api), viewer.id, &post);
        let moderation = ModerationController::for_viewer(api, viewer, &post, feed);
        Self {
            post,
            segments,
            engagement,
            moderation,
        }
    }

    /// Build views for every post on a page that is not tombstoned.
    pub fn for_page(
        api: &Arc<FeedApi<T>>,
        viewer: &Viewer,
        page: &FeedPage,
        feed: Option<&FeedHandle>,
    ) -> Vec<Self> {
        page.visible()
            .map(|p| Self::new(Arc::clone(api), viewer, p.clone(), feed.cloned()))
            .collect()
    }

    /// The post as fetched.
    pub fn post(&self) -> &PostEntity {
        &self.post
    }

    /// Like control.
    pub fn engagement(&self) -> &EngagementController<T> {
        &self.engagement
    }

    /// Moderation control, present only for moderators of this post.
    pub fn moderation(&self) -> Option<&ModerationController<T>> {
        self.moderation.as_ref()
    }

    /// Body segments to display, honoring moderation hides made here.
    pub async fn body(&self) -> Vec<Segment> {
        if self.is_hidden().await {
            return vec![Segment::Text(HIDDEN_PLACEHOLDER.to_string())];
        }
        self.segments.clone()
    }

    /// Hidden as currently displayed.
    pub async fn is_hidden(&self) -> bool {
        match &self.moderation {
            Some(moderation) => moderation.state().await.is_hidden(),
            None => self.post.hidden,
        }
    }

    /// Deleted from this view; should no longer be rendered.
    pub async fn is_deleted(&self) -> bool {
        match &self.moderation {
            Some(moderation) => moderation.state().await.is_deleted(),
            None => self.post.deleted,
        }
    }

    /// Feed a freshly fetched copy of the same post into the controls.
    pub async fn sync(&self, fresh: &PostEntity) {
        if fresh.id == self.post.id {
            self.engagement.sync(fresh).await;
        }
    }
}
