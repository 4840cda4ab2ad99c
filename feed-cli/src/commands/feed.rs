//! Show a page of posts.

use anyhow::{Context, Result};
use std::sync::Arc;

use feed_client::{FeedApi, FeedSyncEngine, PostView, Transport};
use feed_types::{CursorDirection, FeedSource, UserId, Viewer};

use super::{print_post, FeedArgs};

/// Run the feed command.
pub async fn run<T: Transport + 'static>(
    api: Arc<FeedApi<T>>,
    viewer: &Viewer,
    args: FeedArgs,
) -> Result<()> {
    let source = match args.organization {
        Some(id) => FeedSource::Organization(UserId::new(id)),
        None => FeedSource::All,
    };
    let cursor = match (args.before, args.after) {
        (Some(id), _) => Some(CursorDirection::Before(id)),
        (None, Some(id)) => Some(CursorDirection::After(id)),
        (None, None) => None,
    };

    let (engine, handle) = FeedSyncEngine::new(Arc::clone(&api), source);
    let engine_task = engine.spawn();

    if let Some(text) = &args.search {
        handle.search(text.as_str())?;
        handle.settled().await;
    }
    match cursor {
        Some(cursor) => handle.set_cursor(cursor)?,
        None if args.search.is_none() => handle.refresh()?,
        None => {}
    }
    let snapshot = handle.settled().await;

    if let Some(error) = &snapshot.error {
        anyhow::bail!("Failed to load feed: {}", error);
    }

    let views = PostView::for_page(&api, viewer, &snapshot.page, Some(&handle));
    if views.is_empty() {
        println!("No posts.");
    }
    for view in &views {
        print_post(view).await;
        println!();
    }

    let mut nav = Vec::new();
    if let Some(CursorDirection::After(id)) = snapshot.page.prev_cursor() {
        nav.push(format!("newer: --after {}", id));
    } else if snapshot.can_go_previous() {
        nav.push("newer: available".to_string());
    }
    if let Some(CursorDirection::Before(id)) = snapshot.page.next_cursor() {
        nav.push(format!("older: --before {}", id));
    } else if snapshot.can_go_next() {
        nav.push("older: available".to_string());
    }
    if !nav.is_empty() {
        println!("{}", nav.join("  "));
    }

    drop(views);
    drop(handle);
    engine_task.await.context("Feed engine panicked")?;
    Ok(())
}
