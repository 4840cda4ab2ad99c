//! Like/unlike state machine for one post.
//!
//! Pure: takes events, returns the new state plus actions. The client layer
//! sends the actual like request and feeds the outcome back in.
//!
//! ```text
//!            ToggleRequested             Confirmed
//!   Idle ───────────────────► InFlight ────────────► Idle (sent direction, new count)
//!                                │
//!                                │ Failed
//!                                ▼
//!                             Disabled (terminal)
//! ```

use feed_types::{FeedError, LikeAction, PostEntity, UserId};

/// Per-post engagement state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementState {
    viewer: UserId,
    liked_by_viewer: bool,
    like_count: u64,
    /// The request outstanding, if any.
    in_flight: Option<LikeAction>,
    disabled: bool,
    /// Likers from the last entity we synced from.
    synced_likers: Vec<UserId>,
}

/// Inputs to the engagement state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngagementEvent {
    /// The viewer pressed the like button.
    ToggleRequested,
    /// The server accepted the like/unlike and reported the new count.
    Confirmed {
        /// Server like count.
        likes: u64,
    },
    /// The like/unlike request failed.
    Failed {
        /// What went wrong.
        error: FeedError,
    },
    /// A fresh copy of the post arrived (e.g. after a refetch).
    EntityRefreshed {
        /// Likers in the fresh copy.
        liked_by: Vec<UserId>,
        /// Like count in the fresh copy.
        like_count: u64,
    },
}

/// Instructions for the client layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngagementAction {
    /// Send a like request in this direction.
    Send(LikeAction),
    /// The control is now disabled for good.
    Disabled {
        /// The failure that caused it.
        error: FeedError,
    },
}

impl EngagementState {
    /// Initial state for `viewer` looking at `post`.
    pub fn new(viewer: UserId, post: &PostEntity) -> Self {
        Self {
            viewer,
            liked_by_viewer: post.is_liked_by(viewer),
            like_count: post.like_count,
            in_flight: None,
            disabled: false,
            synced_likers: post.liked_by.clone(),
        }
    }

    /// Process an event and return the new state plus actions to execute.
    pub fn on_event(mut self, event: EngagementEvent) -> (Self, Vec<EngagementAction>) {
        match event {
            EngagementEvent::ToggleRequested => {
                if self.in_flight.is_some() || self.disabled {
                    return (self, vec![]);
                }
                let action = if self.liked_by_viewer {
                    LikeAction::Unlike
                } else {
                    LikeAction::Like
                };
                self.in_flight = Some(action);
                (self, vec![EngagementAction::Send(action)])
            }

            EngagementEvent::Confirmed { likes } if self.in_flight.is_some() => {
                // The confirmed direction wins over a refresh that landed
                // while the request was out.
                self.liked_by_viewer = self.in_flight.take() == Some(LikeAction::Like);
                self.like_count = likes;
                (self, vec![])
            }

            EngagementEvent::Failed { error } if self.in_flight.is_some() => {
                self.in_flight = None;
                self.disabled = true;
                (self, vec![EngagementAction::Disabled { error }])
            }

            EngagementEvent::EntityRefreshed {
                liked_by,
                like_count,
            } => {
                if liked_by != self.synced_likers {
                    self.liked_by_viewer = liked_by.contains(&self.viewer);
                    self.like_count = like_count;
                    self.synced_likers = liked_by;
                }
                (self, vec![])
            }

            // Outcome with nothing in flight
            EngagementEvent::Confirmed { .. } | EngagementEvent::Failed { .. } => {
                (self, vec![])
            }
        }
    }

    /// Whether the viewer currently likes the post, as displayed.
    pub fn liked_by_viewer(&self) -> bool {
        self.liked_by_viewer
    }

    /// Like count, as displayed.
    pub fn like_count(&self) -> u64 {
        self.like_count
    }

    /// A like/unlike request is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// A previous request failed; the control no longer responds.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Like state derived from the last synced entity, ignoring local actions.
    pub fn server_liked_by_viewer(&self) -> bool {
        self.synced_likers.contains(&self.viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_types::{Author, PostId, Role};

    const VIEWER: UserId = UserId::new(7);

    fn post(likes: u64, liked_by: &[u64]) -> PostEntity {
        PostEntity {
            id: PostId::new(1),
            author: Author {
                id: UserId::new(2),
                display_name: "club".into(),
                avatar_url: String::new(),
                role: Role::Organization,
            },
            content: Some("hi".into()),
            created_at: None,
            topics: vec![],
            like_count: likes,
            liked_by: liked_by.iter().copied().map(UserId::new).collect(),
            hidden: false,
            deleted: false,
        }
    }

    #[test]
    fn initial_state_derives_from_likers() {
        let state = EngagementState::new(VIEWER, &post(3, &[1, 7, 9]));
        assert!(state.liked_by_viewer());
        assert_eq!(state.like_count(), 3);

        let state = EngagementState::new(VIEWER, &post(1, &[1]));
        assert!(!state.liked_by_viewer());
    }

    #[test]
    fn toggle_sends_like_when_not_liked() {
        let state = EngagementState::new(VIEWER, &post(0, &[]));
        let (state, actions) = state.on_event(EngagementEvent::ToggleRequested);

        assert!(state.is_in_flight());
        assert_eq!(actions, vec![EngagementAction::Send(LikeAction::Like)]);
    }

    #[test]
    fn toggle_sends_unlike_when_liked() {
        let state = EngagementState::new(VIEWER, &post(1, &[7]));
        let (_, actions) = state.on_event(EngagementEvent::ToggleRequested);
        assert_eq!(actions, vec![EngagementAction::Send(LikeAction::Unlike)]);
    }

    #[test]
    fn second_toggle_while_in_flight_is_ignored() {
        let state = EngagementState::new(VIEWER, &post(0, &[]));
        let (state, first) = state.on_event(EngagementEvent::ToggleRequested);
        let (state, second) = state.on_event(EngagementEvent::ToggleRequested);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert!(state.is_in_flight());
    }

    #[test]
    fn confirmation_uses_server_count_and_flips() {
        let state = EngagementState::new(VIEWER, &post(4, &[]));
        let (state, _) = state.on_event(EngagementEvent::ToggleRequested);
        let (state, actions) = state.on_event(EngagementEvent::Confirmed { likes: 9 });

        assert!(actions.is_empty());
        assert!(!state.is_in_flight());
        assert!(state.liked_by_viewer());
        assert_eq!(state.like_count(), 9);
        // Server view is unchanged until a fresh entity arrives
        assert!(!state.server_liked_by_viewer());
    }

    #[test]
    fn failure_latches_disabled() {
        let state = EngagementState::new(VIEWER, &post(4, &[]));
        let (state, _) = state.on_event(EngagementEvent::ToggleRequested);
        let (state, actions) = state.on_event(EngagementEvent::Failed {
            error: FeedError::ServerRejected(500),
        });

        assert!(!state.is_in_flight());
        assert!(state.is_disabled());
        assert!(matches!(
            actions.as_slice(),
            [EngagementAction::Disabled { .. }]
        ));
        assert_eq!(state.like_count(), 4);

        let (state, actions) = state.on_event(EngagementEvent::ToggleRequested);
        assert!(actions.is_empty());
        assert!(!state.is_in_flight());
    }

    #[test]
    fn refreshed_entity_wins_over_local_state() {
        let state = EngagementState::new(VIEWER, &post(4, &[]));
        let (state, _) = state.on_event(EngagementEvent::ToggleRequested);
        let (state, _) = state.on_event(EngagementEvent::Confirmed { likes: 5 });
        assert!(state.liked_by_viewer());

        // Someone else's unlike raced ours; server says we are not a liker
        let (state, _) = state.on_event(EngagementEvent::EntityRefreshed {
            liked_by: vec![UserId::new(3)],
            like_count: 1,
        });
        assert!(!state.liked_by_viewer());
        assert_eq!(state.like_count(), 1);
    }

    #[test]
    fn refresh_during_like_keeps_confirmed_direction() {
        let state = EngagementState::new(VIEWER, &post(0, &[]));
        let (state, _) = state.on_event(EngagementEvent::ToggleRequested);

        // A refetch already shows our like before the response arrives
        let (state, _) = state.on_event(EngagementEvent::EntityRefreshed {
            liked_by: vec![VIEWER],
            like_count: 1,
        });
        let (state, _) = state.on_event(EngagementEvent::Confirmed { likes: 1 });

        assert!(state.liked_by_viewer());
        assert!(state.server_liked_by_viewer());
        assert_eq!(state.like_count(), 1);

        // Next press unlikes instead of liking twice
        let (_, actions) = state.on_event(EngagementEvent::ToggleRequested);
        assert_eq!(actions, vec![EngagementAction::Send(LikeAction::Unlike)]);
    }

    #[test]
    fn refresh_during_unlike_keeps_confirmed_direction() {
        let state = EngagementState::new(VIEWER, &post(1, &[7]));
        let (state, _) = state.on_event(EngagementEvent::ToggleRequested);
        let (state, _) = state.on_event(EngagementEvent::EntityRefreshed {
            liked_by: vec![],
            like_count: 0,
        });
        let (state, _) = state.on_event(EngagementEvent::Confirmed { likes: 0 });

        assert!(!state.liked_by_viewer());
        assert_eq!(state.like_count(), 0);
    }

    #[test]
    fn unchanged_likers_do_not_resync() {
        let state = EngagementState::new(VIEWER, &post(0, &[]));
        let (state, _) = state.on_event(EngagementEvent::ToggleRequested);
        let (state, _) = state.on_event(EngagementEvent::Confirmed { likes: 1 });

        let (state, _) = state.on_event(EngagementEvent::EntityRefreshed {
            liked_by: vec![],
            like_count: 0,
        });
        assert!(state.liked_by_viewer());
        assert_eq!(state.like_count(), 1);
    }

    #[test]
    fn stray_confirmation_is_ignored() {
        let state = EngagementState::new(VIEWER, &post(2, &[]));
        let (state, actions) = state.on_event(EngagementEvent::Confirmed { likes: 50 });
        assert!(actions.is_empty());
        assert_eq!(state.like_count(), 2);
        assert!(!state.liked_by_viewer());
    }
}
