//! # feed-types
//!
//! Data model and wire format types for the Torospace feed client.
//!
//! This crate provides the foundational types used across all feed crates:
//! - [`PostId`], [`UserId`], [`TopicId`] - Server-assigned identifiers
//! - [`PostEntity`], [`Role`], [`Viewer`] - One post and who is looking at it
//! - [`FeedQuery`], [`CursorDirection`], [`FeedPage`], [`FeedSource`] - Paging
//! - [`PostObject`], [`PostsResponse`], [`LikeResponse`], ... - JSON wire shapes
//! - [`FeedError`] - Error kinds surfaced to callers

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod post;
mod query;
mod wire;

pub use error::FeedError;
pub use ids::{PostId, TopicId, UserId};
pub use post::{
    Author, PostEntity, Role, Viewer, HIDDEN_PLACEHOLDER, MISSING_CONTENT_PLACEHOLDER,
    UNKNOWN_DATE,
};
pub use query::{CursorDirection, FeedPage, FeedQuery, FeedSource, DEFAULT_PAGE_SIZE};
pub use wire::{
    AuthorObject, CreatePostRequest, LikeAction, LikeResponse, LikerObject, PostObject,
    PostsResponse, Topic, TopicObject, TopicsResponse, Visibility,
};
