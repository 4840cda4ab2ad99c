//! CLI command implementations.

pub mod feed;
pub mod like;
pub mod moderate;
pub mod post;
pub mod show;
pub mod topics;

use feed_client::{PostView, Transport};
use feed_core::Segment;
use feed_types::PostId;

/// Arguments of the `feed` command.
#[derive(Debug, Clone, Default)]
pub struct FeedArgs {
    /// Search text.
    pub search: Option<String>,
    /// Older than this post.
    pub before: Option<PostId>,
    /// Newer than this post.
    pub after: Option<PostId>,
    /// Organization whose posts to list.
    pub organization: Option<u64>,
}

/// Print one post the way every command shows it.
pub async fn print_post<T: Transport>(view: &PostView<T>) {
    let post = view.post();
    let engagement = view.engagement().state().await;

    println!(
        "#{}  {} ({:?})  {}",
        post.id,
        post.author.display_name,
        post.author.role,
        post.created_label()
    );
    println!("    {}", format_body(&view.body().await));

    let mut footer = format!("likes: {}", engagement.like_count());
    if engagement.liked_by_viewer() {
        footer.push_str(" (liked)");
    }
    if !post.topics.is_empty() {
        footer.push_str(&format!("  topics: {}", post.topics.join(", ")));
    }
    if view.moderation().is_some() {
        footer.push_str("  [moderator]");
    }
    println!("    {}", footer);
}

/// Plain-text rendering: a link whose target differs from its text is
/// shown as `text <href>`.
pub fn format_body(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.clone(),
            Segment::Link { text, href } if text == href => text.clone(),
            Segment::Link { text, href } => format!("{} <{}>", text, href),
        })
        .collect()
}
