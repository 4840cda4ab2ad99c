//! Hide, unhide or delete a post.

use anyhow::{Context, Result};
use std::sync::Arc;

use feed_client::{FeedApi, ModerationController, Transport};
use feed_types::{PostId, Viewer};

/// Moderation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Hide.
    Hide,
    /// Unhide.
    Unhide,
    /// Delete.
    Delete,
}

/// Run a moderation command.
pub async fn run<T: Transport + 'static>(
    api: Arc<FeedApi<T>>,
    viewer: &Viewer,
    id: PostId,
    op: Op,
) -> Result<()> {
    let post = api
        .fetch_post(id)
        .await
        .with_context(|| format!("Failed to fetch post {}", id))?;

    let Some(moderation) = ModerationController::for_viewer(api, viewer, &post, None) else {
        anyhow::bail!(
            "{:?} users cannot moderate post #{} by {}",
            viewer.role,
            id,
            post.author.display_name
        );
    };

    let (result, done) = match op {
        Op::Hide => (moderation.hide().await, "Hid"),
        Op::Unhide => (moderation.unhide().await, "Unhid"),
        Op::Delete => (moderation.delete().await, "Deleted"),
    };
    result.with_context(|| format!("Failed to moderate post {}", id))?;

    println!("{} post #{}", done, id);
    Ok(())
}
