use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, trace};

use super::state::PlaybackState;

/// Snapshots a subscriber may leave unread before newer ones are dropped for it.
pub const SUBSCRIBER_BACKLOG: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

/// A registered subscriber's id and the receiving end of its channel.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub rx: Receiver<PlaybackState>,
}

/// Fans snapshots out to every registered subscriber.
///
/// Delivery goes over bounded channels with `try_send`: a subscriber that falls
/// [`SUBSCRIBER_BACKLOG`] snapshots behind misses the newer ones until it drains,
/// and never holds up the publisher. Subscribers whose receiver was dropped are
/// pruned on the next publish. Nothing is replayed to late subscribers.
#[derive(Debug, Default)]
pub struct StateBroadcaster {
    subscribers: Mutex<Vec<(SubscriberId, SyncSender<PlaybackState>)>>,
    next_id: AtomicU64,
}

impl StateBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(SubscriberId, SyncSender<PlaybackState>)>> {
        // A panicking subscriber cannot leave the list half-edited; keep going.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reserve an id for use with [`register`](Self::register).
    pub fn next_id(&self) -> SubscriberId {
        SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register `tx` under `id`. Registering an id that is already present keeps
    /// the existing registration and returns `false`.
    pub fn register(&self, id: SubscriberId, tx: SyncSender<PlaybackState>) -> bool {
        let mut subs = self.lock();
        if subs.iter().any(|(sid, _)| *sid == id) {
            return false;
        }
        subs.push((id, tx));
        debug!(subscriber = id.0, total = subs.len(), "subscriber registered");
        true
    }

    /// Open a fresh channel and register it.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::sync_channel(SUBSCRIBER_BACKLOG);
        let id = self.next_id();
        self.register(id, tx);
        Subscription { id, rx }
    }

    /// Drop the registration for `id`. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subs = self.lock();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        let removed = subs.len() != before;
        if removed {
            debug!(subscriber = id.0, total = subs.len(), "subscriber removed");
        }
        removed
    }

    pub fn publish(&self, state: &PlaybackState) {
        let mut subs = self.lock();
        subs.retain(|(id, tx)| match tx.try_send(state.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                trace!(subscriber = id.0, "subscriber backlog full, snapshot dropped");
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                trace!(subscriber = id.0, "pruning disconnected subscriber");
                false
            }
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }
}
