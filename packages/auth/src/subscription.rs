use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use board_core::Principal;

/// Callback fed with the principal after each session transition.
pub type SessionCallback = Arc<dyn Fn(Option<Principal>) + Send + Sync>;

/// Registered session callbacks, invoked in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    callbacks: Mutex<BTreeMap<u64, SessionCallback>>,
}

impl Listeners {
    pub(crate) fn register(self: &Arc<Self>, callback: SessionCallback) -> SessionSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, callback);
        SessionSubscription {
            listeners: Arc::downgrade(self),
            id,
        }
    }

    pub(crate) fn notify(&self, principal: Option<&Principal>) {
        let callbacks: Vec<SessionCallback> = self
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(principal.cloned());
        }
    }

    fn remove(&self, id: u64) {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Handle keeping a session callback registered. Dropping it detaches the callback.
#[must_use = "dropping the subscription detaches the callback"]
pub struct SessionSubscription {
    listeners: Weak<Listeners>,
    id: u64,
}

impl SessionSubscription {
    /// Detach the callback now.
    pub fn unsubscribe(self) {}
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}

impl std::fmt::Debug for SessionSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSubscription")
            .field("id", &self.id)
            .finish()
    }
}
