//! Like or unlike a post.

use anyhow::{Context, Result};
use std::sync::Arc;

use feed_client::{EngagementController, FeedApi, Transport};
use feed_types::{PostId, Viewer};

/// Run the like command.
pub async fn run<T: Transport + 'static>(
    api: Arc<FeedApi<T>>,
    viewer: &Viewer,
    id: PostId,
) -> Result<()> {
    let post = api
        .fetch_post(id)
        .await
        .with_context(|| format!("Failed to fetch post {}", id))?;

    let engagement = EngagementController::new(api, viewer.id, &post);
    engagement
        .toggle_like()
        .await
        .with_context(|| format!("Failed to update like on post {}", id))?;

    let state = engagement.state().await;
    let verb = if state.liked_by_viewer() { "Liked" } else { "Unliked" };
    println!("{} post #{} (likes: {})", verb, id, state.like_count());
    Ok(())
}
