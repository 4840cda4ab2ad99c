//! Moderation capability and per-post moderation state.
//!
//! Admins may moderate any post; organizations may moderate their own.
//! Everyone else never gets moderation controls.
//!
//! Deletion is soft from the client's point of view: a successful delete
//! tombstones the post locally and asks the feed to refetch. The post is
//! never spliced out of the current page.

use feed_types::{FeedError, PostEntity, Role, Viewer, Visibility, HIDDEN_PLACEHOLDER};

/// Whether `viewer` may hide, unhide or delete `post`.
pub fn can_moderate(viewer: &Viewer, post: &PostEntity) -> bool {
    match viewer.role {
        Role::Admin => true,
        Role::Organization => viewer.id == post.author.id,
        Role::Regular => false,
    }
}

/// A moderation request that can be outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationRequest {
    /// Hide or unhide.
    SetVisibility(Visibility),
    /// Delete.
    Delete,
}

/// Per-post moderation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationState {
    permitted: bool,
    hidden: bool,
    deleted: bool,
    in_flight: Option<ModerationRequest>,
}

/// Inputs to the moderation state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationEvent {
    /// The moderator asked for a request.
    Requested(ModerationRequest),
    /// The outstanding request got a 2xx response.
    Completed,
    /// The outstanding request failed.
    Failed {
        /// What went wrong.
        error: FeedError,
    },
}

/// Instructions for the client layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationAction {
    /// Send this request.
    Send(ModerationRequest),
    /// Ask the owning feed for an explicit refresh.
    RefreshFeed,
    /// The request was refused or failed; surface it.
    Report {
        /// The error to surface.
        error: FeedError,
    },
}

impl ModerationState {
    /// Initial state for `viewer` looking at `post`.
    pub fn new(viewer: &Viewer, post: &PostEntity) -> Self {
        Self {
            permitted: can_moderate(viewer, post),
            hidden: post.hidden,
            deleted: post.deleted,
            in_flight: None,
        }
    }

    /// Process an event and return the new state plus actions to execute.
    pub fn on_event(mut self, event: ModerationEvent) -> (Self, Vec<ModerationAction>) {
        match (self.in_flight, event) {
            (_, ModerationEvent::Requested(_)) if !self.permitted => (
                self,
                vec![ModerationAction::Report {
                    error: FeedError::NotPermitted,
                }],
            ),
            (None, ModerationEvent::Requested(request)) if !self.deleted => {
                self.in_flight = Some(request);
                (self, vec![ModerationAction::Send(request)])
            }

            (Some(ModerationRequest::SetVisibility(v)), ModerationEvent::Completed) => {
                self.in_flight = None;
                self.hidden = v.hidden();
                (self, vec![])
            }
            (Some(ModerationRequest::Delete), ModerationEvent::Completed) => {
                self.in_flight = None;
                self.deleted = true;
                (self, vec![ModerationAction::RefreshFeed])
            }

            (Some(_), ModerationEvent::Failed { error }) => {
                self.in_flight = None;
                (self, vec![ModerationAction::Report { error }])
            }

            // Busy, already deleted, or a stray outcome
            (state_in_flight, _) => {
                self.in_flight = state_in_flight;
                (self, vec![])
            }
        }
    }

    /// The viewer gets moderation controls for this post.
    pub fn is_permitted(&self) -> bool {
        self.permitted
    }

    /// Hidden, as displayed.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Deleted locally; excluded from re-render.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// A moderation request is outstanding.
    pub fn in_flight(&self) -> Option<ModerationRequest> {
        self.in_flight
    }

    /// Text to display in place of `body`.
    pub fn display<'a>(&self, body: &'a str) -> &'a str {
        if self.hidden {
            HIDDEN_PLACEHOLDER
        } else {
            body
        }
    }
}
