// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Change listeners for the offline queue.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use hs_core::QueuedAction;

type Listener = Arc<dyn Fn(&[QueuedAction]) + Send + Sync>;

#[derive(Default)]
struct ListenerSet {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Registry of queue snapshot listeners.
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    set: Arc<Mutex<ListenerSet>>,
}

impl Listeners {
    pub(crate) fn add<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[QueuedAction]) + Send + Sync + 'static,
    {
        let mut set = self.set.lock().unwrap_or_else(PoisonError::into_inner);
        let id = set.next_id;
        set.next_id += 1;
        set.entries.push((id, Arc::new(listener)));
        Subscription {
            id,
            set: Arc::downgrade(&self.set),
        }
    }

    /// Invoke every current listener with `snapshot`.
    ///
    /// Listeners run outside the registry lock, so one may drop its own
    /// subscription from inside the callback.
    pub(crate) fn notify(&self, snapshot: &[QueuedAction]) {
        let current: Vec<Listener> = {
            let set = self.set.lock().unwrap_or_else(PoisonError::into_inner);
            set.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in current {
            listener(snapshot);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}

/// Handle returned by `OfflineQueue::subscribe`.
///
/// The listener stays registered until this handle is dropped or
/// [`unsubscribe`](Subscription::unsubscribe) is called.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    set: Weak<Mutex<ListenerSet>>,
}

impl Subscription {
    /// Remove the listener.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(set) = self.set.upgrade() {
            set.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
