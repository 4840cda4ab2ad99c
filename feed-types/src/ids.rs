//! Identity types for the feed.
//!
//! All identifiers are assigned by the server and are opaque to the client:
//! they are compared for equality and echoed back in paths and cursors, never
//! interpreted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a post.
///
/// Doubles as the pagination cursor: pages are bounded by the id of the
/// first or last visible post.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(u64);

impl PostId {
    /// Create a PostId from its wire value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the wire value of this PostId.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostId({})", self.0)
    }
}

/// Identifier of a user (regular member, organization or admin).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Create a UserId from its wire value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the wire value of this UserId.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

/// Identifier of a topic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(u64);

impl TopicId {
    /// Create a TopicId from its wire value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the wire value of this TopicId.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicId({})", self.0)
    }
}
