//! Feed synchronization state machine.
//!
//! Decides when a page fetch is needed and which responses may be applied.
//! The async engine in feed-client dispatches the fetches and feeds the
//! outcomes back in as events, in arrival order.
//!
//! Rules:
//! - A search or cursor trigger whose resulting query equals the last
//!   dispatched one is dropped, unless the last fetch failed.
//! - A created post, a deleted post or an explicit refresh always
//!   refetches the current query.
//! - Next/Previous are anchored on the shown page, so they are ignored while
//!   a fetch is loading.
//! - A deleted post is tombstoned in the shown page and in every page loaded
//!   afterwards; it is never spliced out locally.
//! - Fetches are never cancelled. Only the response to the most recently
//!   dispatched request is applied; anything older is discarded.
//! - A failed fetch replaces the page with an empty one and records the
//!   error until the next trigger.

use std::collections::BTreeSet;
use std::fmt;

use feed_types::{CursorDirection, FeedError, FeedPage, FeedQuery, PostId};

/// Identifies one dispatched fetch. Strictly increasing per state machine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Get the raw sequence number.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.0)
    }
}

/// Something that may require a new page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The search box changed; resets the cursor.
    SearchChanged(String),
    /// Jump to an explicit page boundary.
    CursorChanged(CursorDirection),
    /// Older posts, bounded by the last visible post.
    NextPage,
    /// Newer posts, bounded by the first visible post.
    PreviousPage,
    /// The viewer just created a post.
    PostCreated(PostId),
    /// A post was deleted; tombstone it and refetch.
    PostDeleted(PostId),
    /// Someone asked for a refetch (e.g. after a delete).
    RefreshRequested,
}

/// Inputs to the feed state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A trigger arrived.
    Trigger(Trigger),
    /// A fetch resolved with a page.
    FetchSucceeded {
        /// Which fetch.
        request: RequestId,
        /// The page it returned.
        page: FeedPage,
    },
    /// A fetch failed.
    FetchFailed {
        /// Which fetch.
        request: RequestId,
        /// Why.
        error: FeedError,
    },
}

/// Observable outcomes, for logging and subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A trigger produced no fetch because nothing would change.
    TriggerIgnored {
        /// The dropped trigger.
        trigger: Trigger,
    },
    /// The latest fetch resolved and its page is now current.
    PageLoaded {
        /// Which fetch.
        request: RequestId,
        /// Number of posts on the page.
        items: usize,
    },
    /// The latest fetch failed; the page is now empty.
    FetchFailed {
        /// Which fetch.
        request: RequestId,
        /// Why.
        error: FeedError,
    },
    /// A response arrived after a newer request was dispatched.
    StaleResponseDiscarded {
        /// The superseded fetch.
        request: RequestId,
    },
}

/// Actions to be executed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetch this page and report back with the request id.
    Fetch {
        /// Id to tag the outcome with.
        request: RequestId,
        /// Page to fetch.
        query: FeedQuery,
    },
    /// Surface an event.
    EmitEvent(FeedEvent),
}

/// What a subscriber sees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedSnapshot {
    /// Query of the page being shown or loaded.
    pub query: FeedQuery,
    /// Latest resolved page.
    pub page: FeedPage,
    /// A fetch for the current query is outstanding.
    pub loading: bool,
    /// Error from the latest fetch, if it failed.
    pub error: Option<FeedError>,
    /// Triggers processed so far, dropped ones included.
    pub triggers_seen: u64,
}

impl FeedSnapshot {
    /// Whether the Next control is enabled.
    pub fn can_go_next(&self) -> bool {
        self.page.has_next
    }

    /// Whether the Previous control is enabled.
    pub fn can_go_previous(&self) -> bool {
        self.page.has_prev
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Dispatched {
    request: RequestId,
    query: FeedQuery,
}

/// Feed state. NO I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSyncState {
    query: FeedQuery,
    page: FeedPage,
    loading: bool,
    error: Option<FeedError>,
    latest: Option<Dispatched>,
    next_request: u64,
    outstanding: usize,
    triggers_seen: u64,
    tombstones: BTreeSet<PostId>,
}

impl FeedSyncState {
    /// Fresh state for `query`. Nothing is fetched until a trigger arrives.
    pub fn new(query: FeedQuery) -> Self {
        Self {
            query,
            page: FeedPage::empty(),
            loading: false,
            error: None,
            latest: None,
            next_request: 1,
            outstanding: 0,
            triggers_seen: 0,
            tombstones: BTreeSet::new(),
        }
    }

    /// Process an event and return the new state plus actions to execute.
    pub fn on_event(mut self, event: Event) -> (Self, Vec<Action>) {
        match event {
            Event::Trigger(trigger) => {
                self.triggers_seen += 1;
                let actions = self.on_trigger(trigger);
                (self, actions)
            }
            Event::FetchSucceeded { request, page } => {
                self.outstanding = self.outstanding.saturating_sub(1);
                if !self.is_latest(request) {
                    return (self, stale(request));
                }
                let items = page.items.len();
                self.page = page;
                self.apply_tombstones();
                self.loading = false;
                self.error = None;
                (
                    self,
                    vec![Action::EmitEvent(FeedEvent::PageLoaded { request, items })],
                )
            }
            Event::FetchFailed { request, error } => {
                self.outstanding = self.outstanding.saturating_sub(1);
                if !self.is_latest(request) {
                    return (self, stale(request));
                }
                self.page = FeedPage::empty();
                self.loading = false;
                self.error = Some(error.clone());
                (
                    self,
                    vec![Action::EmitEvent(FeedEvent::FetchFailed { request, error })],
                )
            }
        }
    }

    fn on_trigger(&mut self, trigger: Trigger) -> Vec<Action> {
        let candidate = match &trigger {
            Trigger::SearchChanged(text) => Some(self.query.with_search(text.as_str())),
            Trigger::CursorChanged(cursor) => Some(self.query.with_cursor(*cursor)),
            Trigger::NextPage | Trigger::PreviousPage if self.loading => None,
            Trigger::NextPage => self.page.next_cursor().map(|c| self.query.with_cursor(c)),
            Trigger::PreviousPage => self.page.prev_cursor().map(|c| self.query.with_cursor(c)),
            Trigger::PostDeleted(id) => {
                self.tombstones.insert(*id);
                self.apply_tombstones();
                return vec![self.dispatch(self.query.clone())];
            }
            Trigger::PostCreated(_) | Trigger::RefreshRequested => {
                return vec![self.dispatch(self.query.clone())];
            }
        };

        match candidate {
            Some(query) if !self.is_redundant(&query) => vec![self.dispatch(query)],
            _ => vec![Action::EmitEvent(FeedEvent::TriggerIgnored { trigger })],
        }
    }

    fn apply_tombstones(&mut self) {
        for post in &mut self.page.items {
            if self.tombstones.contains(&post.id) {
                post.deleted = true;
            }
        }
    }

    fn is_redundant(&self, query: &FeedQuery) -> bool {
        self.error.is_none() && self.latest.as_ref().is_some_and(|d| d.query == *query)
    }

    fn is_latest(&self, request: RequestId) -> bool {
        self.latest.as_ref().is_some_and(|d| d.request == request)
    }

    fn dispatch(&mut self, query: FeedQuery) -> Action {
        let request = RequestId(self.next_request);
        self.next_request += 1;
        self.outstanding += 1;
        self.query = query.clone();
        self.loading = true;
        self.error = None;
        self.latest = Some(Dispatched {
            request,
            query: query.clone(),
        });
        Action::Fetch { request, query }
    }

    /// Current query.
    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    /// Latest resolved page.
    pub fn page(&self) -> &FeedPage {
        &self.page
    }

    /// Whether the latest fetch is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error from the latest fetch.
    pub fn error(&self) -> Option<&FeedError> {
        self.error.as_ref()
    }

    /// Whether `id` was deleted through this feed.
    pub fn is_tombstoned(&self, id: PostId) -> bool {
        self.tombstones.contains(&id)
    }

    /// Number of dispatched fetches that have not resolved, stale ones included.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Snapshot for subscribers.
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            query: self.query.clone(),
            page: self.page.clone(),
            loading: self.loading,
            error: self.error.clone(),
            triggers_seen: self.triggers_seen,
        }
    }
}

impl Default for FeedSyncState {
    fn default() -> Self {
        Self::new(FeedQuery::default())
    }
}

fn stale(request: RequestId) -> Vec<Action> {
    vec![Action::EmitEvent(FeedEvent::StaleResponseDiscarded {
        request,
    })]
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_types::{Author, PostEntity, Role, UserId};

    fn post(id: u64) -> PostEntity {
        PostEntity {
            id: PostId::new(id),
            author: Author {
                id: UserId::new(1),
                display_name: "club".into(),
                avatar_url: String::new(),
                role: Role::Organization,
            },
            content: Some(format!("post {}", id)),
            created_at: None,
            topics: vec![],
            like_count: 0,
            liked_by: vec![],
            hidden: false,
            deleted: false,
        }
    }

    fn page(ids: &[u64], has_prev: bool, has_next: bool) -> FeedPage {
        FeedPage {
            items: ids.iter().copied().map(post).collect(),
            has_next,
            has_prev,
        }
    }

    fn fetches(actions: &[Action]) -> Vec<(RequestId, FeedQuery)> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Fetch { request, query } => Some((*request, query.clone())),
                Action::EmitEvent(_) => None,
            })
            .collect()
    }

    fn trigger(state: FeedSyncState, t: Trigger) -> (FeedSyncState, Vec<Action>) {
        state.on_event(Event::Trigger(t))
    }

    fn loaded(state: FeedSyncState, request: RequestId, p: FeedPage) -> FeedSyncState {
        state
            .on_event(Event::FetchSucceeded { request, page: p })
            .0
    }

    // ===== Dispatch =====

    #[test]
    fn refresh_fetches_first_page() {
        let (state, actions) = trigger(FeedSyncState::default(), Trigger::RefreshRequested);
        let f = fetches(&actions);

        assert_eq!(f.len(), 1);
        assert_eq!(f[0].1, FeedQuery::default());
        assert!(state.is_loading());
        assert_eq!(state.outstanding(), 1);
        assert_eq!(state.snapshot().triggers_seen, 1);
    }

    #[test]
    fn same_search_twice_fetches_once() {
        let state = FeedSyncState::default();
        let (state, first) = trigger(state, Trigger::SearchChanged("cs".into()));
        let (state, second) = trigger(state, Trigger::SearchChanged("cs".into()));

        assert_eq!(fetches(&first).len(), 1);
        assert!(fetches(&second).is_empty());
        assert!(matches!(
            second.as_slice(),
            [Action::EmitEvent(FeedEvent::TriggerIgnored { .. })]
        ));
        assert_eq!(state.outstanding(), 1);
    }

    #[test]
    fn distinct_queries_each_fetch() {
        let state = FeedSyncState::default();
        let (state, a) = trigger(state, Trigger::SearchChanged("a".into()));
        let (state, b) = trigger(state, Trigger::SearchChanged("b".into()));
        let (_, c) = trigger(
            state,
            Trigger::CursorChanged(CursorDirection::Before(PostId::new(4))),
        );

        assert_eq!(fetches(&a)[0].1.search_text, "a");
        assert_eq!(fetches(&b)[0].1.search_text, "b");
        let q = &fetches(&c)[0].1;
        assert_eq!(q.search_text, "b");
        assert_eq!(q.cursor, CursorDirection::Before(PostId::new(4)));
    }

    #[test]
    fn search_resets_cursor() {
        let state = FeedSyncState::default();
        let (state, _) = trigger(
            state,
            Trigger::CursorChanged(CursorDirection::After(PostId::new(9))),
        );
        let (_, actions) = trigger(state, Trigger::SearchChanged("club".into()));
        assert_eq!(fetches(&actions)[0].1.cursor, CursorDirection::None);
    }

    #[test]
    fn refresh_and_post_created_always_fetch() {
        let state = FeedSyncState::default();
        let (state, _) = trigger(state, Trigger::SearchChanged("x".into()));
        let (state, refresh) = trigger(state, Trigger::RefreshRequested);
        let (state, created) = trigger(state, Trigger::PostCreated(PostId::new(77)));

        assert_eq!(fetches(&refresh)[0].1.search_text, "x");
        assert_eq!(fetches(&created)[0].1.search_text, "x");
        assert_eq!(state.outstanding(), 3);
    }

    #[test]
    fn failed_query_can_be_retried_by_same_trigger() {
        let (state, actions) = trigger(
            FeedSyncState::default(),
            Trigger::SearchChanged("x".into()),
        );
        let request = fetches(&actions)[0].0;
        let (state, _) = state.on_event(Event::FetchFailed {
            request,
            error: FeedError::Timeout,
        });

        let (_, retry) = trigger(state, Trigger::SearchChanged("x".into()));
        assert_eq!(fetches(&retry).len(), 1);
    }

    // ===== Resolution =====

    #[test]
    fn success_replaces_page() {
        let (state, actions) = trigger(FeedSyncState::default(), Trigger::RefreshRequested);
        let request = fetches(&actions)[0].0;
        let (state, actions) = state.on_event(Event::FetchSucceeded {
            request,
            page: page(&[3, 2, 1], false, true),
        });

        assert!(!state.is_loading());
        assert_eq!(state.page().items.len(), 3);
        assert_eq!(
            actions,
            vec![Action::EmitEvent(FeedEvent::PageLoaded { request, items: 3 })]
        );
        assert_eq!(state.outstanding(), 0);
    }

    #[test]
    fn failure_resets_to_empty_page() {
        let (state, actions) = trigger(FeedSyncState::default(), Trigger::RefreshRequested);
        let state = loaded(state, fetches(&actions)[0].0, page(&[3, 2], true, true));

        let (state, actions) = trigger(state, Trigger::RefreshRequested);
        let request = fetches(&actions)[0].0;
        let (state, _) = state.on_event(Event::FetchFailed {
            request,
            error: FeedError::ServerRejected(500),
        });

        let snapshot = state.snapshot();
        assert!(snapshot.page.items.is_empty());
        assert!(!snapshot.can_go_next());
        assert!(!snapshot.can_go_previous());
        assert_eq!(snapshot.error, Some(FeedError::ServerRejected(500)));
        assert!(!snapshot.loading);
    }

    #[test]
    fn late_response_for_older_request_is_discarded() {
        let state = FeedSyncState::default();
        let (state, a) = trigger(state, Trigger::SearchChanged("a".into()));
        let (state, b) = trigger(state, Trigger::SearchChanged("b".into()));
        let (ra, rb) = (fetches(&a)[0].0, fetches(&b)[0].0);

        // B resolves first, then A shows up late
        let state = loaded(state, rb, page(&[20], false, false));
        let (state, actions) = state.on_event(Event::FetchSucceeded {
            request: ra,
            page: page(&[10], false, false),
        });

        assert_eq!(
            actions,
            vec![Action::EmitEvent(FeedEvent::StaleResponseDiscarded {
                request: ra
            })]
        );
        assert_eq!(state.page().items[0].id, PostId::new(20));
        assert_eq!(state.query().search_text, "b");
        assert_eq!(state.outstanding(), 0);
    }

    #[test]
    fn early_response_for_older_request_does_not_end_loading() {
        let state = FeedSyncState::default();
        let (state, a) = trigger(state, Trigger::SearchChanged("a".into()));
        let (state, _) = trigger(state, Trigger::SearchChanged("b".into()));

        let state = loaded(state, fetches(&a)[0].0, page(&[10], false, false));
        assert!(state.is_loading());
        assert!(state.page().items.is_empty());
    }

    #[test]
    fn stale_failure_is_discarded() {
        let state = FeedSyncState::default();
        let (state, a) = trigger(state, Trigger::SearchChanged("a".into()));
        let (state, b) = trigger(state, Trigger::SearchChanged("b".into()));
        let state = loaded(state, fetches(&b)[0].0, page(&[1], false, false));

        let (state, _) = state.on_event(Event::FetchFailed {
            request: fetches(&a)[0].0,
            error: FeedError::Timeout,
        });
        assert!(state.error().is_none());
        assert_eq!(state.page().items.len(), 1);
    }

    // ===== Pagination =====

    #[test]
    fn empty_page_can_enable_next_but_not_previous() {
        let (state, actions) = trigger(FeedSyncState::default(), Trigger::RefreshRequested);
        let state = loaded(state, fetches(&actions)[0].0, page(&[], false, true));

        let snapshot = state.snapshot();
        assert!(snapshot.can_go_next());
        assert!(!snapshot.can_go_previous());
    }

    #[test]
    fn next_and_previous_use_boundary_ids() {
        let (state, actions) = trigger(FeedSyncState::default(), Trigger::RefreshRequested);
        let state = loaded(state, fetches(&actions)[0].0, page(&[30, 29, 28], true, true));

        let (_, next) = trigger(state.clone(), Trigger::NextPage);
        assert_eq!(
            fetches(&next)[0].1.cursor,
            CursorDirection::Before(PostId::new(28))
        );

        let (_, prev) = trigger(state, Trigger::PreviousPage);
        assert_eq!(
            fetches(&prev)[0].1.cursor,
            CursorDirection::After(PostId::new(30))
        );
    }

    #[test]
    fn disabled_direction_is_ignored() {
        let (state, actions) = trigger(FeedSyncState::default(), Trigger::RefreshRequested);
        let state = loaded(state, fetches(&actions)[0].0, page(&[5], false, false));

        let (state, next) = trigger(state, Trigger::NextPage);
        let (_, prev) = trigger(state, Trigger::PreviousPage);
        assert!(fetches(&next).is_empty());
        assert!(fetches(&prev).is_empty());
    }

    #[test]
    fn paging_while_loading_is_ignored() {
        let (state, actions) = trigger(FeedSyncState::default(), Trigger::RefreshRequested);
        let state = loaded(state, fetches(&actions)[0].0, page(&[30, 29], true, true));

        // The shown page belongs to the old filter
        let (state, _) = trigger(state, Trigger::SearchChanged("club".into()));
        let (state, next) = trigger(state, Trigger::NextPage);
        let (state, prev) = trigger(state, Trigger::PreviousPage);

        assert!(fetches(&next).is_empty());
        assert!(fetches(&prev).is_empty());
        assert!(matches!(
            next.as_slice(),
            [Action::EmitEvent(FeedEvent::TriggerIgnored { .. })]
        ));
        assert_eq!(state.query().cursor, CursorDirection::None);
        assert_eq!(state.outstanding(), 1);
    }

    #[test]
    fn delete_tombstones_shown_post_and_refetches() {
        let (state, actions) = trigger(
            FeedSyncState::default(),
            Trigger::SearchChanged("x".into()),
        );
        let state = loaded(state, fetches(&actions)[0].0, page(&[3, 2, 1], false, false));

        let (state, actions) = trigger(state, Trigger::PostDeleted(PostId::new(2)));
        let f = fetches(&actions);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].1.search_text, "x");

        // Still on the page, marked, until the refetch lands
        assert_eq!(state.page().items.len(), 3);
        let visible: Vec<_> = state.page().visible().map(|p| p.id.value()).collect();
        assert_eq!(visible, vec![3, 1]);
        assert!(state.is_tombstoned(PostId::new(2)));
    }

    #[test]
    fn tombstone_survives_a_page_that_still_lists_the_post() {
        let (state, actions) = trigger(FeedSyncState::default(), Trigger::RefreshRequested);
        let state = loaded(state, fetches(&actions)[0].0, page(&[3, 2], false, false));

        let (state, actions) = trigger(state, Trigger::PostDeleted(PostId::new(2)));
        let state = loaded(state, fetches(&actions)[0].0, page(&[3, 2], false, false));

        let visible: Vec<_> = state.page().visible().map(|p| p.id.value()).collect();
        assert_eq!(visible, vec![3]);
    }

    #[test]
    fn refetch_after_delete_drops_post() {
        let (state, actions) = trigger(FeedSyncState::default(), Trigger::RefreshRequested);
        let state = loaded(state, fetches(&actions)[0].0, page(&[3, 2, 1], false, false));
        assert!(state.page().contains(PostId::new(2)));

        let (state, actions) = trigger(state, Trigger::RefreshRequested);
        let state = loaded(state, fetches(&actions)[0].0, page(&[3, 1], false, false));
        assert!(!state.page().contains(PostId::new(2)));
    }
}
