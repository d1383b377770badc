//! Subscriber identities for the reactive system.
//!
//! A [`Notifier`] is a callback with a stable identity. Sources deduplicate
//! their subscriber sets on that identity, so subscribing the same notifier
//! twice only registers it once, and unsubscribing needs the notifier (or a
//! clone of it) that was used to subscribe.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a subscriber.
///
/// Every notifier gets a fresh ID when it is created. Clones of a notifier
/// carry the same ID, which is what makes them the "same" subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// A subscriber callback with a stable identity.
///
/// Notifiers are invoked with no arguments. Whatever the callback needs to
/// observe (usually the signal it subscribed to) it captures itself.
#[derive(Clone)]
pub struct Notifier {
    id: SubscriberId,
    callback: Rc<dyn Fn()>,
}

impl Notifier {
    /// Create a new notifier with a fresh identity.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            id: SubscriberId::new(),
            callback: Rc::new(callback),
        }
    }

    /// Get the notifier's identity.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Invoke the callback.
    pub fn notify(&self) {
        (self.callback)();
    }
}

impl PartialEq for Notifier {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Notifier {}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier").field("id", &self.id).finish()
    }
}
