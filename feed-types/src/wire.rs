//! JSON wire shapes of the feed service.
//!
//! Field names match the service byte-for-byte. The service encodes empty
//! lists as `null`, so every list field accepts `null` as empty.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{PostId, Role, TopicId, UserId};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A post as returned by the service.
///
/// Everything is optional here; [`crate::PostEntity`] decides what is
/// required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostObject {
    /// Post id.
    #[serde(default)]
    pub id: Option<PostId>,
    /// Author.
    #[serde(default)]
    pub author: Option<AuthorObject>,
    /// Body text.
    #[serde(default)]
    pub content: Option<String>,
    /// RFC 3339 creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Attached topics.
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<TopicObject>,
    /// Like count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u64,
    /// Users who liked the post.
    #[serde(default, deserialize_with = "null_as_default")]
    pub liked_by: Vec<LikerObject>,
    /// Hidden flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hidden: bool,
}

/// Post author as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorObject {
    /// Author id.
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Role.
    #[serde(default)]
    pub role: Option<Role>,
}

/// A topic reference inside a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicObject {
    /// Topic id, when the service includes it.
    #[serde(default)]
    pub id: Option<TopicId>,
    /// Topic name.
    pub name: String,
}

/// A liker reference inside a post. Only the id is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikerObject {
    /// Liker's user id.
    pub id: UserId,
}

/// Response to `GET /posts` and `GET /organizations/{id}/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostsResponse {
    /// The page, newest first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub posts: Vec<PostObject>,
    /// Older posts exist beyond this page.
    pub has_before: bool,
    /// Newer posts exist beyond this page.
    pub has_after: bool,
}

/// Response to a like/unlike request.
///
/// The service may send the whole updated post; only `likes` is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
    /// New like count.
    pub likes: u64,
}

/// Body of `POST /account/self/user/{userId}/post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostRequest {
    /// Post body with hashtags removed.
    pub content: String,
    /// Topic names extracted from hashtags.
    pub topics: Vec<String>,
}

/// A topic as listed by `GET /topics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Topic id.
    pub id: TopicId,
    /// Topic name.
    pub name: String,
}

/// Response to `GET /topics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsResponse {
    /// Matching topics.
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<Topic>,
}

/// Direction of a like request (`?type=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    /// Add the viewer's like.
    Like,
    /// Remove the viewer's like.
    Unlike,
}

impl LikeAction {
    /// Query-string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Unlike => "unlike",
        }
    }
}

/// Visibility change requested by a moderator (`?action=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Hide the post from regular viewers.
    Hide,
    /// Make a hidden post visible again.
    Unhide,
}

impl Visibility {
    /// Query-string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hide => "hide",
            Self::Unhide => "unhide",
        }
    }

    /// The `hidden` flag a post has after this change.
    pub fn hidden(&self) -> bool {
        matches!(self, Self::Hide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_response_accepts_null_posts() {
        let resp: PostsResponse =
            serde_json::from_str(r#"{"posts": null, "count": 0, "has_before": false, "has_after": false}"#)
                .unwrap();
        assert!(resp.posts.is_empty());
    }

    #[test]
    fn posts_response_requires_cursor_flags() {
        let result: Result<PostsResponse, _> = serde_json::from_str(r#"{"posts": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn post_object_accepts_null_lists() {
        let obj: PostObject = serde_json::from_str(
            r#"{"id": 1, "author": {"id": 2}, "topics": null, "liked_by": null, "likes": null}"#,
        )
        .unwrap();
        assert!(obj.topics.is_empty());
        assert!(obj.liked_by.is_empty());
        assert_eq!(obj.likes, 0);
    }

    #[test]
    fn like_response_reads_full_post_body() {
        let resp: LikeResponse = serde_json::from_str(
            r#"{"id": 3, "content": "hi", "likes": 7, "liked_by": [{"id": 1}]}"#,
        )
        .unwrap();
        assert_eq!(resp.likes, 7);
    }

    #[test]
    fn create_request_field_names() {
        let req = CreatePostRequest {
            content: "Hello".into(),
            topics: vec!["cs".into()],
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"content":"Hello","topics":["cs"]}"#);
    }

    #[test]
    fn query_values() {
        assert_eq!(LikeAction::Like.as_str(), "like");
        assert_eq!(LikeAction::Unlike.as_str(), "unlike");
        assert_eq!(Visibility::Hide.as_str(), "hide");
        assert_eq!(Visibility::Unhide.as_str(), "unhide");
        assert!(Visibility::Hide.hidden());
        assert!(!Visibility::Unhide.hidden());
    }
}
