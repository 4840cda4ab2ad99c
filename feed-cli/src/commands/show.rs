//! Show one post.

use anyhow::{Context, Result};
use std::sync::Arc;

use feed_client::{FeedApi, PostView, Transport};
use feed_types::{PostId, Viewer};

use super::print_post;

/// Run the show command.
pub async fn run<T: Transport + 'static>(
    api: Arc<FeedApi<T>>,
    viewer: &Viewer,
    id: PostId,
) -> Result<()> {
    let post = api
        .fetch_post(id)
        .await
        .with_context(|| format!("Failed to fetch post {}", id))?;

    let view = PostView::new(api, viewer, post, None);
    print_post(&view).await;
    Ok(())
}
