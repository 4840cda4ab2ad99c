//! FeedSyncEngine - the async driver of the feed state machine.
//!
//! ```text
//! FeedHandle ──trigger──┐
//!                       ▼
//!                  mpsc channel ──► FeedSyncEngine ──► FeedSyncState (pure)
//!                       ▲                │
//!   fetch task ─outcome─┘                ├──► spawn fetch task ──► FeedApi
//!                                        └──► watch<FeedSnapshot>
//! ```
//!
//! Triggers and fetch outcomes share one channel, so the state machine sees
//! them strictly in arrival order. Fetch tasks hold a sender while they
//! run: the engine stops once every handle is dropped and every
//! outstanding fetch has reported back. Triggers still queued when the last
//! handle goes away are applied to the state but start no fetch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use feed_core::{Action, Event, FeedEvent, FeedSnapshot, FeedSyncState, Trigger};
use feed_types::{CursorDirection, FeedQuery, FeedSource, PostId};

use crate::api::FeedApi;
use crate::transport::Transport;

/// The engine behind a handle is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("feed engine stopped")]
pub struct EngineStopped;

/// Owns the feed state and performs its fetches.
pub struct FeedSyncEngine<T: Transport + 'static> {
    api: Arc<FeedApi<T>>,
    source: FeedSource,
    state: FeedSyncState,
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::WeakUnboundedSender<Event>,
    snapshot: watch::Sender<FeedSnapshot>,
}

impl<T: Transport + 'static> FeedSyncEngine<T> {
    /// Create an engine paging over `source` and the handle that drives it.
    ///
    /// Nothing is fetched until the first trigger.
    pub fn new(api: Arc<FeedApi<T>>, source: FeedSource) -> (Self, FeedHandle) {
        let state = FeedSyncState::new(FeedQuery::new(api.config().page_size));
        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshot, snapshot_rx) = watch::channel(state.snapshot());

        let engine = Self {
            api,
            source,
            state,
            rx,
            tx: tx.downgrade(),
            snapshot,
        };
        let handle = FeedHandle {
            tx,
            snapshot: snapshot_rx,
            sent: Arc::new(AtomicU64::new(0)),
        };
        (engine, handle)
    }

    /// Run the engine on a new task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Process events until every handle and fetch task is gone.
    pub async fn run(mut self) {
        info!(source = ?self.source, "Feed engine started");
        while let Some(event) = self.rx.recv().await {
            self.handle(event);
        }
        info!(source = ?self.source, "Feed engine stopped");
    }

    fn handle(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        let (state, actions) = state.on_event(event);
        self.state = state;

        for action in actions {
            self.execute(action);
        }
        self.snapshot.send_replace(self.state.snapshot());
    }

    fn execute(&self, action: Action) {
        match action {
            Action::Fetch { request, query } => {
                let Some(tx) = self.tx.upgrade() else {
                    debug!(%request, "No handles left, skipping fetch");
                    return;
                };
                debug!(%request, ?query, "Dispatching fetch");

                let api = Arc::clone(&self.api);
                let source = self.source;
                tokio::spawn(async move {
                    let event = match api.fetch_page(source, &query).await {
                        Ok(page) => Event::FetchSucceeded { request, page },
                        Err(error) => Event::FetchFailed { request, error },
                    };
                    // Engine only goes away after this sender is dropped
                    let _ = tx.send(event);
                });
            }
            Action::EmitEvent(event) => log_event(&event),
        }
    }
}

fn log_event(event: &FeedEvent) {
    match event {
        FeedEvent::TriggerIgnored { trigger } => {
            debug!(?trigger, "Trigger produced no new query");
        }
        FeedEvent::PageLoaded { request, items } => {
            info!(%request, items, "Page loaded");
        }
        FeedEvent::FetchFailed { request, error } => {
            warn!(%request, %error, "Page fetch failed");
        }
        FeedEvent::StaleResponseDiscarded { request } => {
            debug!(%request, "Discarded response to superseded fetch");
        }
    }
}

/// Cloneable handle to a running [`FeedSyncEngine`].
#[derive(Debug, Clone)]
pub struct FeedHandle {
    tx: mpsc::UnboundedSender<Event>,
    snapshot: watch::Receiver<FeedSnapshot>,
    sent: Arc<AtomicU64>,
}

impl FeedHandle {
    /// Push a trigger to the engine.
    pub fn trigger(&self, trigger: Trigger) -> Result<(), EngineStopped> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        self.tx
            .send(Event::Trigger(trigger))
            .map_err(|_| EngineStopped)
    }

    /// The search text changed. Goes back to the first page.
    pub fn search(&self, text: impl Into<String>) -> Result<(), EngineStopped> {
        self.trigger(Trigger::SearchChanged(text.into()))
    }

    /// Jump to an explicit page boundary.
    pub fn set_cursor(&self, cursor: CursorDirection) -> Result<(), EngineStopped> {
        self.trigger(Trigger::CursorChanged(cursor))
    }

    /// Older posts. Ignored while Next is disabled or a fetch is loading.
    pub fn next_page(&self) -> Result<(), EngineStopped> {
        self.trigger(Trigger::NextPage)
    }

    /// Newer posts. Ignored while Previous is disabled or a fetch is loading.
    pub fn previous_page(&self) -> Result<(), EngineStopped> {
        self.trigger(Trigger::PreviousPage)
    }

    /// A post was just created.
    pub fn post_created(&self, id: PostId) -> Result<(), EngineStopped> {
        self.trigger(Trigger::PostCreated(id))
    }

    /// A post was deleted. It stays on the shown page marked as deleted
    /// and the current query is refetched.
    pub fn post_deleted(&self, id: PostId) -> Result<(), EngineStopped> {
        self.trigger(Trigger::PostDeleted(id))
    }

    /// Refetch the current query.
    pub fn refresh(&self) -> Result<(), EngineStopped> {
        self.trigger(Trigger::RefreshRequested)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshot.clone()
    }

    /// Wait until every trigger sent so far is processed and the latest
    /// fetch has resolved, then return the snapshot.
    pub async fn settled(&self) -> FeedSnapshot {
        let target = self.sent.load(Ordering::SeqCst);
        let mut rx = self.snapshot.clone();
        if let Ok(snapshot) = rx
            .wait_for(|s| s.triggers_seen >= target && !s.loading)
            .await
        {
            return snapshot.clone();
        }
        // Engine stopped; the last published value is final
        let snapshot = rx.borrow().clone();
        snapshot
    }
}
