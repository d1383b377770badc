//! The contract shared by everything a UI fragment can subscribe to.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Notifier;

/// Unique identifier for a source.
///
/// Handles that point at the same underlying source (clones of a signal,
/// for instance) report the same ID. The binding adapter uses it to decide
/// whether it has been rebound to a different source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    /// Generate a new unique source ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A type-erased, shared source.
pub type Source = Rc<dyn Watchable>;

/// Anything that notifiers can subscribe to.
///
/// Both operations are total: subscribing an already subscribed notifier and
/// unsubscribing one that was never subscribed are no-ops.
pub trait Watchable {
    /// Stable identity of the underlying source.
    fn source_id(&self) -> SourceId;

    /// Register a notifier. Idempotent per notifier identity.
    fn subscribe(&self, notifier: &Notifier);

    /// Remove a notifier if present.
    fn unsubscribe(&self, notifier: &Notifier);

    /// Erase this handle into a shared [`Source`].
    fn to_source(&self) -> Source
    where
        Self: Clone + Sized + 'static,
    {
        Rc::new(self.clone())
    }
}
