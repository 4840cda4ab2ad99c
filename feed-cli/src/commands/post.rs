//! Create a post.

use anyhow::{Context, Result};
use std::sync::Arc;

use feed_client::{FeedApi, FeedSyncEngine, PostComposer, PostView, Transport};
use feed_core::extract_topics;
use feed_types::{FeedSource, Viewer};

use super::print_post;

/// Run the post command.
///
/// Shows the refreshed first page afterwards, so the new post is visible
/// the way the server placed it.
pub async fn run<T: Transport + 'static>(
    api: Arc<FeedApi<T>>,
    viewer: Viewer,
    text: &str,
) -> Result<()> {
    let (engine, handle) = FeedSyncEngine::new(Arc::clone(&api), FeedSource::All);
    let engine_task = engine.spawn();

    let (_, topics) = extract_topics(text);
    let mut composer = PostComposer::new(Arc::clone(&api), viewer, Some(handle.clone()));
    composer.set_input(text);
    let id = composer.submit().await.context("Failed to create post")?;

    if topics.is_empty() {
        println!("Created post #{}", id);
    } else {
        println!("Created post #{} (topics: {})", id, topics.join(", "));
    }

    let snapshot = handle.settled().await;
    if let Some(view) = snapshot
        .page
        .items
        .iter()
        .find(|p| p.id == id)
        .map(|p| PostView::new(Arc::clone(&api), &viewer, p.clone(), None))
    {
        println!();
        print_post(&view).await;
    }

    drop(composer);
    drop(handle);
    engine_task.await.context("Feed engine panicked")?;
    Ok(())
}
