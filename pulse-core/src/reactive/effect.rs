//! Effect Implementation
//!
//! An Effect is a scoped subscription: it couples one source to one
//! notifier for as long as the handle lives.
//!
//! # How Effects Work
//!
//! 1. On attach, the notifier is subscribed to the source immediately.
//!
//! 2. While the effect is active, every notification pass of the source
//!    invokes the notifier.
//!
//! 3. On release, the notifier is unsubscribed. Releasing is idempotent, and
//!    dropping the handle releases it, so the subscription ends with the
//!    owning scope even when nobody calls `release` explicitly.

use std::cell::Cell;

use super::{Notifier, Source, SourceId, Watchable};

/// A subscription that is released when dropped.
///
/// # Example
///
/// ```rust
/// use pulse_core::reactive::{Effect, Signal, Watchable};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let count = Signal::new(0);
/// let runs = Rc::new(Cell::new(0));
///
/// {
///     let runs = runs.clone();
///     let _effect = Effect::new(count.to_source(), move || runs.set(runs.get() + 1));
///     count.set(1);
/// }
///
/// count.set(2);
/// assert_eq!(runs.get(), 1);
/// ```
pub struct Effect {
    source: Source,
    notifier: Notifier,
    active: Cell<bool>,
}

impl Effect {
    /// Subscribe `notifier` to `source` and return the handle owning that
    /// subscription.
    #[must_use = "dropping the Effect unsubscribes immediately"]
    pub fn attach(source: Source, notifier: Notifier) -> Self {
        source.subscribe(&notifier);
        tracing::debug!(
            source = %source.source_id(),
            subscriber = %notifier.id(),
            "effect attached"
        );
        Self {
            source,
            notifier,
            active: Cell::new(true),
        }
    }

    /// Subscribe a closure to `source`.
    #[must_use = "dropping the Effect unsubscribes immediately"]
    pub fn new<F>(source: Source, f: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::attach(source, Notifier::new(f))
    }

    /// Unsubscribe from the source. Later calls do nothing.
    pub fn release(&self) {
        if self.active.replace(false) {
            self.source.unsubscribe(&self.notifier);
            tracing::debug!(
                source = %self.source.source_id(),
                subscriber = %self.notifier.id(),
                "effect released"
            );
        }
    }

    /// Check whether the subscription is still in place.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// The notifier this effect subscribed.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Identity of the source this effect is attached to.
    pub fn source_id(&self) -> SourceId {
        self.source.source_id()
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("source", &self.source.source_id())
            .field("subscriber", &self.notifier.id())
            .field("active", &self.is_active())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
