//! # feed-core
//!
//! Pure logic for the Torospace feed (no I/O, instant tests).
//!
//! Every state machine here takes events and returns the new state plus a
//! list of actions. `feed-client` performs the requests those actions ask
//! for and feeds the outcomes back in.
//!
//! - [`render`]: post body to text/link segments
//! - [`compose`]: hashtag extraction and draft validation
//! - [`engagement`]: per-post like/unlike
//! - [`moderation`]: capability check and per-post hide/unhide/delete
//! - [`feed`]: page fetch lifecycle and stale-response filtering

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compose;
pub mod engagement;
pub mod feed;
pub mod moderation;
pub mod render;

pub use compose::{extract_topics, Draft};
pub use engagement::{EngagementAction, EngagementEvent, EngagementState};
pub use feed::{Action, Event, FeedEvent, FeedSnapshot, FeedSyncState, RequestId, Trigger};
pub use moderation::{
    can_moderate, ModerationAction, ModerationEvent, ModerationRequest, ModerationState,
};
pub use render::{render, visible_text, Segment};
