//! Cart change notification
//!
//! Observers register a callback and receive every [`CartEvent`]. A
//! [`Subscription`] removes its listener when dropped; `unsubscribe` does the
//! same explicitly by id.

use super::models::CartEvent;
use dashmap::DashMap;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Callback invoked once per cart mutation
pub type Listener = Arc<dyn Fn(&CartEvent) + Send + Sync>;

type Registry = DashMap<Uuid, Listener>;

/// Fan-out of cart events to any number of listeners
#[derive(Clone, Default)]
pub struct CartNotifier {
    listeners: Arc<Registry>,
}

impl std::fmt::Debug for CartNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CartNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`; it stays active until the returned
    /// [`Subscription`] is dropped or `unsubscribe` is called.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        self.listeners.insert(id, Arc::new(listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.listeners),
        }
    }

    /// Removes a listener. Returns `false` when the id is unknown.
    pub fn unsubscribe(&self, id: Uuid) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Delivers `event` to every current listener exactly once.
    ///
    /// Listeners are snapshotted first so a callback may subscribe or
    /// unsubscribe without deadlocking the registry.
    pub fn notify(&self, event: &CartEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Handle for a registered listener
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&self.id);
        }
    }
}
