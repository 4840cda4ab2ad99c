//! Post composition.
//!
//! Splits free text typed by the author into a body and a topic list. Topics
//! are written inline as hashtags (`#cs`) and removed from the body.

use std::collections::HashSet;

use feed_types::{CreatePostRequest, FeedError};
use once_cell::sync::Lazy;
use regex::Regex;

static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[\p{L}\p{N}]+").expect("valid hashtag regex"));

/// Split raw text into `(body, topics)`.
///
/// Every hashtag is removed from the body; surrounding whitespace is left
/// alone. Topics keep first-seen order and are de-duplicated by exact
/// (case-sensitive) match, without the leading `#`.
pub fn extract_topics(raw: &str) -> (String, Vec<String>) {
    let mut seen = HashSet::new();
    let mut topics = Vec::new();

    for tag in HASHTAG_RE.find_iter(raw) {
        let name = &tag.as_str()[1..];
        if seen.insert(name) {
            topics.push(name.to_string());
        }
    }

    let body = HASHTAG_RE.replace_all(raw, "").into_owned();
    (body, topics)
}

/// A post ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Body with hashtags removed.
    pub content: String,
    /// Topic names, first-seen order.
    pub topics: Vec<String>,
}

impl Draft {
    /// Parse composer input. Fails with [`FeedError::EmptyPost`] when the
    /// input is blank, before any request is made.
    pub fn parse(raw: &str) -> Result<Self, FeedError> {
        if raw.trim().is_empty() {
            return Err(FeedError::EmptyPost);
        }
        let (content, topics) = extract_topics(raw);
        Ok(Self { content, topics })
    }

    /// Request body for the create endpoint.
    pub fn into_request(self) -> CreatePostRequest {
        CreatePostRequest {
            content: self.content,
            topics: self.topics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_case_sensitive_unique_topics() {
        let (body, topics) = extract_topics("Hello #cs #CS world #cs");
        assert_eq!(body, "Hello   world ");
        assert_eq!(topics, vec!["cs", "CS"]);
    }

    #[test]
    fn no_hashtags_leaves_body_untouched() {
        let (body, topics) = extract_topics("plain text, no tags");
        assert_eq!(body, "plain text, no tags");
        assert!(topics.is_empty());
    }

    #[test]
    fn lone_hash_is_not_a_topic() {
        let (body, topics) = extract_topics("issue # 4 and #");
        assert_eq!(body, "issue # 4 and #");
        assert!(topics.is_empty());
    }

    #[test]
    fn hashtag_stops_at_punctuation() {
        let (body, topics) = extract_topics("go #rust! now #web_dev");
        assert_eq!(topics, vec!["rust", "web"]);
        assert_eq!(body, "go ! now _dev");
    }

    #[test]
    fn blank_input_is_rejected() {
        assert_eq!(Draft::parse("   \n\t"), Err(FeedError::EmptyPost));
        assert_eq!(Draft::parse(""), Err(FeedError::EmptyPost));
    }

    #[test]
    fn hashtag_only_input_is_accepted() {
        let draft = Draft::parse("#Careers").unwrap();
        assert_eq!(draft.content, "");
        assert_eq!(draft.topics, vec!["Careers"]);
    }

    #[test]
    fn draft_becomes_request() {
        let request = Draft::parse("Meetup friday #cs").unwrap().into_request();
        assert_eq!(request.content, "Meetup friday ");
        assert_eq!(request.topics, vec!["cs"]);
    }
}
