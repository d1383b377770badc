//! Signal Implementation
//!
//! A Signal is the value cell at the bottom of the reactive core. It holds
//! one value and an ordered set of notifiers, and runs a notification pass
//! whenever the value is written through it.
//!
//! # How Signals Work
//!
//! 1. UI code subscribes a notifier (usually a re-render trigger).
//!
//! 2. An event handler writes the signal with `set`, `set_if_changed` or
//!    `update`.
//!
//! 3. The signal synchronously invokes every notifier that was subscribed
//!    when the pass started, in subscription order.
//!
//! There is no automatic dependency tracking. A fragment that reads a signal
//! without being subscribed to it will not re-render; mutating a captured copy
//! of the value instead of writing through the signal notifies nobody.
//!
//! # Re-entrancy
//!
//! Neither the value nor the subscriber set is borrowed while notifiers run,
//! so a notifier may read or write any signal (including this one), subscribe
//! or unsubscribe. Writes from inside a notifier start a nested pass right
//! away; nothing is batched or coalesced.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::error::{Result, SignalError};
use super::{Effect, Notifier, SourceId, SubscriberId, Watchable};

struct Inner<T> {
    id: SourceId,
    value: RefCell<T>,
    /// Keyed by identity so duplicates collapse; insertion order is the
    /// notification order.
    subscribers: RefCell<IndexMap<SubscriberId, Notifier>>,
}

/// A reactive value cell holding a value of type T.
///
/// `Signal` is a cheap handle: clones point at the same cell and report the
/// same [`SourceId`].
///
/// # Example
///
/// ```rust
/// use pulse_core::reactive::{Notifier, Signal};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let count = Signal::new(0);
/// let seen = Rc::new(Cell::new(0));
///
/// let seen_clone = seen.clone();
/// let reader = count.clone();
/// count.subscribe(&Notifier::new(move || seen_clone.set(reader.get())));
///
/// count.set(5);
/// assert_eq!(seen.get(), 5);
/// ```
pub struct Signal<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Signal<T> {
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                id: SourceId::new(),
                value: RefCell::new(value),
                subscribers: RefCell::new(IndexMap::new()),
            }),
        }
    }

    /// Get the signal's identity.
    pub fn id(&self) -> SourceId {
        self.inner.id
    }

    /// Read the value through a borrow, without cloning it.
    ///
    /// # Panics
    ///
    /// Panics if called from inside this signal's own `update` mutator.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Like [`with`](Self::with), but reports a borrow conflict instead of
    /// panicking.
    pub fn try_with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let guard = self
            .inner
            .value
            .try_borrow()
            .map_err(|_| SignalError::Borrowed { id: self.inner.id })?;
        Ok(f(&guard))
    }

    /// Replace the value and notify every subscriber.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Replace the value and notify, returning the previous value.
    pub fn replace(&self, value: T) -> T {
        let previous = self.inner.value.replace(value);
        self.notify();
        previous
    }

    /// Like [`set`](Self::set), but reports a borrow conflict instead of
    /// panicking. Nobody is notified when the value was not replaced.
    pub fn try_set(&self, value: T) -> Result<()> {
        {
            let mut guard = self
                .inner
                .value
                .try_borrow_mut()
                .map_err(|_| SignalError::BorrowedMut { id: self.inner.id })?;
            *guard = value;
        }
        self.notify();
        Ok(())
    }

    /// Replace the value without notifying anyone.
    ///
    /// Pair with [`notify`](Self::notify) to batch several writes into a
    /// single pass.
    ///
    /// # Panics
    ///
    /// Panics if called from inside this signal's own `update` mutator.
    /// Write through the `&mut T` the mutator receives instead.
    pub fn set_untracked(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
    }

    /// Mutate the value in place, then notify unconditionally.
    ///
    /// There is no equality check here: by the time the notify decision is
    /// made the old value is gone.
    ///
    /// The mutator must not read or write this signal through another
    /// handle; the value is already mutably borrowed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut guard = self.inner.value.borrow_mut();
            f(&mut *guard);
        }
        self.notify();
    }

    /// Like [`update`](Self::update), but reports a borrow conflict instead
    /// of panicking. Nobody is notified when the mutator did not run.
    pub fn try_update(&self, f: impl FnOnce(&mut T)) -> Result<()> {
        {
            let mut guard = self
                .inner
                .value
                .try_borrow_mut()
                .map_err(|_| SignalError::BorrowedMut { id: self.inner.id })?;
            f(&mut *guard);
        }
        self.notify();
        Ok(())
    }

    /// Register a notifier. Subscribing the same identity twice keeps a
    /// single entry.
    pub fn subscribe(&self, notifier: &Notifier) {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        if subscribers.contains_key(&notifier.id()) {
            tracing::trace!(
                signal = %self.inner.id,
                subscriber = %notifier.id(),
                "already subscribed"
            );
            return;
        }
        subscribers.insert(notifier.id(), notifier.clone());
        tracing::trace!(signal = %self.inner.id, subscriber = %notifier.id(), "subscribe");
    }

    /// Wrap a closure in a fresh notifier and subscribe it.
    ///
    /// The returned notifier is what to pass to
    /// [`unsubscribe`](Self::unsubscribe) later.
    pub fn subscribe_fn<F>(&self, f: F) -> Notifier
    where
        F: Fn() + 'static,
    {
        let notifier = Notifier::new(f);
        self.subscribe(&notifier);
        notifier
    }

    /// Remove a notifier. Unknown notifiers are ignored.
    pub fn unsubscribe(&self, notifier: &Notifier) {
        let removed = self
            .inner
            .subscribers
            .borrow_mut()
            .shift_remove(&notifier.id())
            .is_some();
        if removed {
            tracing::trace!(signal = %self.inner.id, subscriber = %notifier.id(), "unsubscribe");
        }
    }

    /// Check whether a notifier is currently subscribed.
    pub fn is_subscribed(&self, notifier: &Notifier) -> bool {
        self.inner.subscribers.borrow().contains_key(&notifier.id())
    }

    /// Run a notification pass.
    ///
    /// The pass iterates a snapshot of the subscriber set taken before the
    /// first notifier runs. Changes a notifier makes to the set take effect
    /// from the next pass on.
    pub fn notify(&self) {
        let snapshot: SmallVec<[Notifier; 4]> =
            self.inner.subscribers.borrow().values().cloned().collect();
        tracing::trace!(signal = %self.inner.id, subscribers = snapshot.len(), "notify");
        for notifier in &snapshot {
            notifier.notify();
        }
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

impl<T: Clone> Signal<T> {
    /// Get a clone of the current value.
    ///
    /// # Panics
    ///
    /// Panics if called from inside this signal's own `update` mutator.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Like [`get`](Self::get), but reports a borrow conflict instead of
    /// panicking.
    pub fn try_get(&self) -> Result<T> {
        self.try_with(T::clone)
    }
}

impl<T: PartialEq> Signal<T> {
    /// Replace the value and notify, unless it equals the current value.
    ///
    /// Returns whether a notification pass ran.
    pub fn set_if_changed(&self, value: T) -> bool {
        let changed = {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        };

        if changed {
            self.notify();
        } else {
            tracing::trace!(signal = %self.inner.id, "unchanged, skipping notify");
        }
        changed
    }
}

impl<T: 'static> Signal<T> {
    /// Subscribe a closure for as long as the returned handle lives.
    #[must_use = "dropping the Effect unsubscribes immediately"]
    pub fn watch<F>(&self, f: F) -> Effect
    where
        F: Fn() + 'static,
    {
        Effect::new(self.to_source(), f)
    }
}

impl<T: 'static> Watchable for Signal<T> {
    fn source_id(&self) -> SourceId {
        self.inner.id
    }

    fn subscribe(&self, notifier: &Notifier) {
        Signal::subscribe(self, notifier);
    }

    fn unsubscribe(&self, notifier: &Notifier) {
        Signal::unsubscribe(self, notifier);
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Display> fmt::Display for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.value.try_borrow() {
            Ok(value) => write!(f, "State({})", *value),
            Err(_) => f.write_str("State(<borrowed>)"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Signal");
        s.field("id", &self.inner.id);
        match self.inner.value.try_borrow() {
            Ok(value) => s.field("value", &*value),
            Err(_) => s.field("value", &format_args!("<borrowed>")),
        };
        s.field("subscriber_count", &self.subscriber_count()).finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<usize>>, Notifier) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let notifier = Notifier::new(move || count_clone.set(count_clone.get() + 1));
        (count, notifier)
    }

    #[test]
    fn signal_get_and_set() {
        let signal = Signal::new(0);
        assert_eq!(signal.get(), 0);

        signal.set(42);
        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn signal_notifies_subscribers() {
        let signal = Signal::new(0);
        let (count, notifier) = counter();
        signal.subscribe(&notifier);

        assert_eq!(count.get(), 0);

        signal.set(1);
        assert_eq!(count.get(), 1);

        signal.set(2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn duplicate_subscribe_notifies_once() {
        let signal = Signal::new(0);
        let (count, notifier) = counter();

        signal.subscribe(&notifier);
        signal.subscribe(&notifier.clone());
        assert_eq!(signal.subscriber_count(), 1);

        signal.set(1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn signal_unsubscribe() {
        let signal = Signal::new(0);
        let (count, notifier) = counter();
        signal.subscribe(&notifier);

        signal.set(1);
        assert_eq!(count.get(), 1);

        signal.unsubscribe(&notifier);
        signal.set(2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unsubscribe_unknown_is_noop() {
        let signal = Signal::new(0);
        let (_, subscribed) = counter();
        let (_, stranger) = counter();
        signal.subscribe(&subscribed);

        signal.unsubscribe(&stranger);
        signal.unsubscribe(&stranger);
        assert_eq!(signal.subscriber_count(), 1);
    }

    #[test]
    fn set_if_changed_skips_equal_values() {
        let signal = Signal::new(0);
        let (count, notifier) = counter();
        signal.subscribe(&notifier);

        assert!(!signal.set_if_changed(0));
        assert_eq!(count.get(), 0);

        assert!(signal.set_if_changed(1));
        assert_eq!(count.get(), 1);
        assert_eq!(signal.get(), 1);
    }

    #[test]
    fn update_notifies_even_without_change() {
        let signal = Signal::new(vec![1, 2]);
        let (count, notifier) = counter();
        signal.subscribe(&notifier);

        signal.update(|v| v.push(3));
        assert_eq!(signal.get(), vec![1, 2, 3]);
        assert_eq!(count.get(), 1);

        signal.update(|_| {});
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn set_untracked_does_not_notify() {
        let signal = Signal::new(false);
        let (count, notifier) = counter();
        signal.subscribe(&notifier);

        signal.set_untracked(true);
        assert!(signal.get());
        assert_eq!(count.get(), 0);

        signal.notify();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn replace_returns_previous() {
        let signal = Signal::new("x".to_string());
        let (count, notifier) = counter();
        signal.subscribe(&notifier);

        assert_eq!(signal.replace("y".to_string()), "x");
        assert_eq!(signal.get(), "y");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn notifies_in_subscription_order() {
        let signal = Signal::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let order = order.clone();
            signal.subscribe_fn(move || order.borrow_mut().push(tag));
        }

        signal.set(1);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn self_unsubscribe_does_not_skip_others() {
        let signal = Signal::new(0);
        let (count, tail) = counter();

        let slot: Rc<RefCell<Option<Notifier>>> = Rc::new(RefCell::new(None));
        let slot_clone = slot.clone();
        let signal_clone = signal.clone();
        let once = Notifier::new(move || {
            if let Some(me) = slot_clone.borrow().as_ref() {
                signal_clone.unsubscribe(me);
            }
        });
        *slot.borrow_mut() = Some(once.clone());

        signal.subscribe(&once);
        signal.subscribe(&tail);

        signal.set(1);
        assert_eq!(count.get(), 1);
        assert!(!signal.is_subscribed(&once));

        signal.set(2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn subscriber_may_write_during_notify() {
        let source = Signal::new(0);
        let mirror = Signal::new(0);

        let source_clone = source.clone();
        let mirror_clone = mirror.clone();
        source.subscribe_fn(move || mirror_clone.set(source_clone.get() * 10));

        source.set(4);
        assert_eq!(mirror.get(), 40);
    }

    #[test]
    fn subscriber_may_write_same_signal_during_notify() {
        let signal = Signal::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let bumper = signal.clone();
        signal.subscribe_fn(move || {
            let value = bumper.get();
            if value < 3 {
                bumper.set(value + 1);
            }
        });

        let seen_clone = seen.clone();
        let reader = signal.clone();
        signal.subscribe_fn(move || seen_clone.borrow_mut().push(reader.get()));

        signal.set(1);

        // One nested pass per write; every pass finishes on the final value
        assert_eq!(*seen.borrow(), vec![3, 3, 3]);
        assert_eq!(signal.get(), 3);
        assert_eq!(signal.subscriber_count(), 2);
    }

    #[test]
    fn subscriber_set_changes_apply_from_next_pass() {
        let signal = Signal::new(0);
        let (removed_count, removed) = counter();
        let (added_count, added) = counter();

        let (signal_clone, removed_clone, added_clone) =
            (signal.clone(), removed.clone(), added.clone());
        let editor = Notifier::new(move || {
            signal_clone.unsubscribe(&removed_clone);
            signal_clone.subscribe(&added_clone);
        });

        signal.subscribe(&editor);
        signal.subscribe(&removed);

        signal.set(1);
        assert_eq!(removed_count.get(), 1);
        assert_eq!(added_count.get(), 0);
        assert!(!signal.is_subscribed(&removed));
        assert!(signal.is_subscribed(&added));

        signal.set(2);
        assert_eq!(removed_count.get(), 1);
        assert_eq!(added_count.get(), 1);
    }

    #[test]
    fn try_set_reports_conflict_inside_update() {
        let signal = Signal::new(false);
        let (count, notifier) = counter();
        signal.subscribe(&notifier);

        let inner = signal.clone();
        signal.update(|visible| {
            assert_eq!(
                inner.try_set(true),
                Err(SignalError::BorrowedMut { id: inner.id() })
            );
            *visible = !*visible;
        });

        assert!(signal.get());
        assert_eq!(count.get(), 1);

        assert_eq!(signal.try_set(false), Ok(()));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn try_accessors_report_borrow_conflicts() {
        let signal = Signal::new(1);
        let inner = signal.clone();

        signal.update(|_| {
            assert_eq!(inner.try_get(), Err(SignalError::Borrowed { id: inner.id() }));
        });

        signal.with(|_| {
            assert_eq!(
                inner.try_update(|v| *v += 1),
                Err(SignalError::BorrowedMut { id: inner.id() })
            );
        });

        assert_eq!(signal.try_get(), Ok(1));
        assert_eq!(signal.try_update(|v| *v += 1), Ok(()));
        assert_eq!(signal.get(), 2);
    }

    #[test]
    fn watch_handle_unsubscribes_on_drop() {
        let signal = Signal::new(0);
        let count = Rc::new(Cell::new(0));
        {
            let count = count.clone();
            let _effect = signal.watch(move || count.set(count.get() + 1));
            signal.set(1);
        }
        signal.set(2);

        assert_eq!(count.get(), 1);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn signal_clone_shares_state() {
        let signal1 = Signal::new(0);
        let signal2 = signal1.clone();

        signal1.set(42);
        assert_eq!(signal2.get(), 42);
        assert_eq!(signal1.id(), signal2.id());
    }

    #[test]
    fn display_formats_as_state() {
        let signal = Signal::new(7);
        assert_eq!(signal.to_string(), "State(7)");
    }
}
