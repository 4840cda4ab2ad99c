//! Post data model.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::wire::PostObject;
use crate::{FeedError, PostId, UserId};

/// Displayed when a post has no creation timestamp, or an unparseable one.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Displayed when the server omits a post's content.
pub const MISSING_CONTENT_PLACEHOLDER: &str = "This is a placeholder post.";

/// Displayed in place of the body of a post that is hidden by a moderator.
pub const HIDDEN_PLACEHOLDER: &str = "This post has been hidden.";

/// Account role, as reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary member. The service historically calls these "student".
    #[default]
    #[serde(alias = "student")]
    Regular,
    /// Organization account; may moderate its own posts.
    Organization,
    /// Administrator; may moderate everything.
    Admin,
}

/// The authenticated user looking at the feed.
///
/// Passed explicitly to everything that needs to know who is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    /// The viewer's user id.
    pub id: UserId,
    /// The viewer's role.
    pub role: Role,
}

impl Viewer {
    /// Create a viewer context.
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Snapshot of a post's author, taken at fetch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Author's user id.
    pub id: UserId,
    /// Name shown next to the post.
    pub display_name: String,
    /// Avatar image URL (may be empty).
    pub avatar_url: String,
    /// Author's role.
    pub role: Role,
}

/// One post and its engagement/moderation state.
///
/// Instances are built fresh from every fetch; the only identity that
/// survives across fetches is [`PostEntity::id`].
#[derive(Debug, Clone, PartialEq)]
pub struct PostEntity {
    /// Server-assigned id.
    pub id: PostId,
    /// Author snapshot.
    pub author: Author,
    /// Body text, if the server sent one.
    pub content: Option<String>,
    /// Creation time, if present and parseable.
    pub created_at: Option<DateTime<FixedOffset>>,
    /// Topic names, in server order.
    pub topics: Vec<String>,
    /// Server-authoritative like count.
    pub like_count: u64,
    /// Users who have liked the post.
    pub liked_by: Vec<UserId>,
    /// Hidden by a moderator.
    pub hidden: bool,
    /// Local tombstone set after a successful delete. Never sent by the server.
    pub deleted: bool,
}

impl PostEntity {
    /// Whether `user` is among the post's likers.
    pub fn is_liked_by(&self, user: UserId) -> bool {
        self.liked_by.contains(&user)
    }

    /// Body text, or the placeholder when absent.
    pub fn body(&self) -> &str {
        self.content
            .as_deref()
            .unwrap_or(MISSING_CONTENT_PLACEHOLDER)
    }

    /// Human-readable creation time, or [`UNKNOWN_DATE`].
    pub fn created_label(&self) -> String {
        match self.created_at {
            Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
            None => UNKNOWN_DATE.to_string(),
        }
    }
}

impl TryFrom<PostObject> for PostEntity {
    type Error = FeedError;

    fn try_from(obj: PostObject) -> Result<Self, Self::Error> {
        let id = obj
            .id
            .ok_or_else(|| FeedError::MalformedResponse("post without id".into()))?;
        let author = obj.author.ok_or_else(|| {
            FeedError::MalformedResponse(format!("post {} without author", id))
        })?;

        let created_at = obj
            .created_at
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok());

        Ok(Self {
            id,
            author: Author {
                id: author.id,
                display_name: author.display_name.unwrap_or_default(),
                avatar_url: author.avatar_url.unwrap_or_default(),
                role: author.role.unwrap_or_default(),
            },
            content: obj.content,
            created_at,
            topics: obj.topics.into_iter().map(|t| t.name).collect(),
            like_count: obj.likes,
            liked_by: obj.liked_by.into_iter().map(|l| l.id).collect(),
            hidden: obj.hidden,
            deleted: false,
        })
    }
}
