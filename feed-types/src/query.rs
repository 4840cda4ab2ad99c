//! Page queries and resolved pages.
//!
//! Both are value objects: a state transition builds a new one rather than
//! editing the current one in place.

use std::num::NonZeroU32;

use crate::wire::PostsResponse;
use crate::{FeedError, PostEntity, PostId, UserId};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// Which side of a boundary post the next page lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorDirection {
    /// First page.
    #[default]
    None,
    /// Posts older than the given id.
    Before(PostId),
    /// Posts newer than the given id.
    After(PostId),
}

/// Immutable description of one page request.
///
/// Two queries are equal iff every field matches; the sync engine uses that
/// equality to drop redundant fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedQuery {
    /// Maximum number of posts per page.
    pub page_size: NonZeroU32,
    /// Page boundary.
    pub cursor: CursorDirection,
    /// Free-text filter (matches content, topic names and author names).
    pub search_text: String,
}

impl FeedQuery {
    /// First page, no filter.
    pub fn new(page_size: NonZeroU32) -> Self {
        Self {
            page_size,
            cursor: CursorDirection::None,
            search_text: String::new(),
        }
    }

    /// Same page size, new filter, back to the first page.
    pub fn with_search(&self, search_text: impl Into<String>) -> Self {
        Self {
            page_size: self.page_size,
            cursor: CursorDirection::None,
            search_text: search_text.into(),
        }
    }

    /// Same filter, different page boundary.
    pub fn with_cursor(&self, cursor: CursorDirection) -> Self {
        Self {
            page_size: self.page_size,
            cursor,
            search_text: self.search_text.clone(),
        }
    }

    /// Query-string pairs, in wire order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("pageSize", self.page_size.to_string())];
        match self.cursor {
            CursorDirection::None => {}
            CursorDirection::Before(id) => pairs.push(("before", id.to_string())),
            CursorDirection::After(id) => pairs.push(("after", id.to_string())),
        }
        pairs.push(("search_query", self.search_text.clone()));
        pairs
    }
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// The collection a feed pages over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSource {
    /// Every post the viewer may see.
    #[default]
    All,
    /// Posts authored by one organization.
    Organization(UserId),
}

impl FeedSource {
    /// Request path for this source.
    pub fn path(&self) -> String {
        match self {
            Self::All => "/posts".to_string(),
            Self::Organization(id) => format!("/organizations/{}/posts", id),
        }
    }
}

/// One resolved page.
///
/// `has_next`/`has_prev` come from the server and are never derived from
/// the number of items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedPage {
    /// Posts on this page, in server order.
    pub items: Vec<PostEntity>,
    /// A "next page" request would return posts.
    pub has_next: bool,
    /// A "previous page" request would return posts.
    pub has_prev: bool,
}

impl FeedPage {
    /// Page with no items and both directions disabled.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a page from the wire response.
    ///
    /// `has_after` enables Next and `has_before` enables Previous, matching
    /// the buttons of the existing web client.
    pub fn from_response(response: PostsResponse) -> Result<Self, FeedError> {
        let items = response
            .posts
            .into_iter()
            .map(PostEntity::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            items,
            has_next: response.has_after,
            has_prev: response.has_before,
        })
    }

    /// Cursor for the next page, if Next is enabled and there is a boundary post.
    pub fn next_cursor(&self) -> Option<CursorDirection> {
        if !self.has_next {
            return None;
        }
        self.items.last().map(|p| CursorDirection::Before(p.id))
    }

    /// Cursor for the previous page, if Previous is enabled and there is a boundary post.
    pub fn prev_cursor(&self) -> Option<CursorDirection> {
        if !self.has_prev {
            return None;
        }
        self.items.first().map(|p| CursorDirection::After(p.id))
    }

    /// Whether the page contains a post with this id.
    pub fn contains(&self, id: PostId) -> bool {
        self.items.iter().any(|p| p.id == id)
    }

    /// Posts that have not been tombstoned locally.
    pub fn visible(&self) -> impl Iterator<Item = &PostEntity> {
        self.items.iter().filter(|p| !p.deleted)
    }
}
