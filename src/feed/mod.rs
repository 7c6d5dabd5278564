//! Whole-collection change feeds.
//!
//! A feed delivers the *full current contents* of one remote collection on
//! every mutation, never deltas. Subscribers therefore apply each delivery
//! as a wholesale replacement, which keeps a burst of updates observably
//! equivalent to its final state.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, Weak};

/// One delivery from a change feed: the full current collection contents, or
/// notice that the feed lapsed and the previous contents remain
/// authoritative.
#[derive(Debug, Clone)]
pub enum FeedMessage<T> {
    Snapshot(T),
    Lapsed(String),
}

struct HubState<T> {
    next_id: u64,
    outlets: Vec<(u64, Sender<FeedMessage<T>>)>,
}

/// Store-side publisher for one subscribable collection.
pub struct FeedHub<T> {
    state: Arc<Mutex<HubState<T>>>,
}

impl<T: Clone> FeedHub<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HubState {
                next_id: 0,
                outlets: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self) -> FeedSubscription<T> {
        self.register(None)
    }

    /// Subscribes and immediately queues `current` for the new subscriber
    /// only, mirroring stores that deliver an initial snapshot on attach.
    pub fn subscribe_seeded(&self, current: T) -> FeedSubscription<T> {
        self.register(Some(current))
    }

    fn register(&self, seed: Option<T>) -> FeedSubscription<T> {
        let (tx, rx) = channel();
        if let Some(current) = seed {
            let _ = tx.send(FeedMessage::Snapshot(current));
        }
        // A poisoned hub yields an inert subscription.
        let mut id = 0;
        let mut detached = true;
        if let Ok(mut state) = self.state.lock() {
            id = state.next_id;
            state.next_id += 1;
            state.outlets.push((id, tx));
            detached = false;
        }
        FeedSubscription {
            id,
            rx,
            hub: Arc::downgrade(&self.state),
            detached,
        }
    }

    /// Delivers the full current contents to every live subscriber.
    pub fn publish(&self, contents: T) {
        if let Ok(mut state) = self.state.lock() {
            state
                .outlets
                .retain(|(_, tx)| tx.send(FeedMessage::Snapshot(contents.clone())).is_ok());
        }
    }

    /// Notifies subscribers that the feed lapsed; their caches stay at the
    /// last-known contents.
    pub fn publish_lapse(&self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%reason, "change feed lapsed");
        if let Ok(mut state) = self.state.lock() {
            state
                .outlets
                .retain(|(_, tx)| tx.send(FeedMessage::Lapsed(reason.clone())).is_ok());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().map(|state| state.outlets.len()).unwrap_or(0)
    }
}

impl<T: Clone> Default for FeedHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of one change-feed attachment.
pub struct FeedSubscription<T> {
    id: u64,
    rx: Receiver<FeedMessage<T>>,
    hub: Weak<Mutex<HubState<T>>>,
    detached: bool,
}

impl<T> FeedSubscription<T> {
    /// Next pending delivery, if any. Once detached this returns nothing,
    /// even for deliveries that were queued before the detach: a late
    /// callback from a dead subscription must never repopulate a cache.
    pub fn poll(&self) -> Option<FeedMessage<T>> {
        if self.detached {
            return None;
        }
        self.rx.try_recv().ok()
    }

    /// Detaches from the hub. Idempotent; also runs on drop.
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        if let Some(state) = self.hub.upgrade() {
            if let Ok(mut state) = state.lock() {
                state.outlets.retain(|(id, _)| *id != self.id);
            }
        }
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

impl<T> Drop for FeedSubscription<T> {
    fn drop(&mut self) {
        self.detach();
    }
}
