//! List topics.

use anyhow::{Context, Result};
use std::sync::Arc;

use feed_client::{FeedApi, Transport};

/// Run the topics command.
pub async fn run<T: Transport + 'static>(api: Arc<FeedApi<T>>, search: &str) -> Result<()> {
    let topics = api
        .fetch_topics(search)
        .await
        .context("Failed to fetch topics")?;

    if topics.is_empty() {
        println!("No topics.");
    }
    for topic in topics {
        println!("#{} ({})", topic.name, topic.id);
    }
    Ok(())
}
