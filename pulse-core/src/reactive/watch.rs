//! Binding adapter between a source and a rendered fragment.
//!
//! A [`Watch`] owns a fragment function (the "children") and a re-render
//! trigger. While mounted, the trigger is subscribed to exactly one source,
//! and every notification re-invokes the fragment and replaces its previous
//! output.
//!
//! Lifecycle, mirroring a component's mount/update/unmount hooks:
//!
//! | from      | event                   | to        | subscription change        |
//! |-----------|-------------------------|-----------|----------------------------|
//! | Unmounted | `mount`                 | Mounted   | subscribe                  |
//! | Mounted   | `rebind`, same source   | Mounted   | none                       |
//! | Mounted   | `rebind`, other source  | Mounted   | unsubscribe old, subscribe |
//! | Mounted   | `unmount` / drop        | Unmounted | unsubscribe                |
//!
//! Rebinding unsubscribes from the old source before subscribing to the new
//! one. A notification fired by a callback sitting between those two steps
//! is not seen by the fragment.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::{Notifier, Source, SourceId, Watchable};

/// Lifecycle phase of a [`Watch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unmounted,
    Mounted,
}

/// Fragment state shared with the re-render trigger.
struct Fragment<V> {
    children: Box<dyn Fn() -> V>,
    output: RefCell<Option<V>>,
    renders: Cell<usize>,
    /// Lives here so the trigger can see it. A pass that unmounts the
    /// adapter still holds the trigger in its snapshot.
    phase: Cell<Phase>,
}

impl<V> Fragment<V> {
    fn render(&self) {
        // The output slot is not borrowed while the children run, so a
        // fragment may write signals that re-render it.
        let view = (self.children)();
        self.output.replace(Some(view));
        self.renders.set(self.renders.get() + 1);
    }
}

/// Re-renders a fragment whenever its bound source notifies.
///
/// # Example
///
/// ```rust
/// use pulse_core::reactive::{Signal, Watch, Watchable};
///
/// let visible = Signal::new(false);
/// let reader = visible.clone();
/// let mut watch = Watch::new(visible.to_source(), move || {
///     if reader.get() { "text" } else { "password" }
/// });
///
/// watch.mount();
/// assert_eq!(watch.view(), Some("password"));
///
/// visible.set(true);
/// assert_eq!(watch.view(), Some("text"));
/// ```
pub struct Watch<V: 'static> {
    source: Source,
    fragment: Rc<Fragment<V>>,
    trigger: Notifier,
}

impl<V: 'static> Watch<V> {
    /// Create an unmounted adapter. Nothing is subscribed or rendered yet.
    pub fn new<F>(source: Source, children: F) -> Self
    where
        F: Fn() -> V + 'static,
    {
        let fragment = Rc::new(Fragment {
            children: Box::new(children),
            output: RefCell::new(None),
            renders: Cell::new(0),
            phase: Cell::new(Phase::Unmounted),
        });

        // Weak, so a source captured by the children cannot keep the
        // fragment alive through its own subscriber set.
        let weak = Rc::downgrade(&fragment);
        let trigger = Notifier::new(move || {
            if let Some(fragment) = weak.upgrade() {
                if fragment.phase.get() == Phase::Mounted {
                    fragment.render();
                }
            }
        });

        Self {
            source,
            fragment,
            trigger,
        }
    }

    /// Subscribe the trigger and render for the first time.
    ///
    /// Mounting an already mounted adapter does nothing.
    pub fn mount(&mut self) {
        if self.is_mounted() {
            tracing::trace!(source = %self.source.source_id(), "watch already mounted");
            return;
        }

        self.source.subscribe(&self.trigger);
        self.fragment.phase.set(Phase::Mounted);
        tracing::debug!(
            source = %self.source.source_id(),
            trigger = %self.trigger.id(),
            "watch mounted"
        );

        self.fragment.render();
    }

    /// Re-render with a possibly different source, as a parent update would.
    ///
    /// When the source identity is unchanged the subscription is left alone.
    /// Otherwise the trigger moves from the old source to the new one. While
    /// unmounted only the stored source is swapped and nothing renders.
    pub fn rebind(&mut self, source: Source) {
        let previous = self.source.source_id();
        let next = source.source_id();

        if !self.is_mounted() {
            self.source = source;
            return;
        }

        if previous != next {
            self.source.unsubscribe(&self.trigger);
            source.subscribe(&self.trigger);
            self.source = source;
            tracing::debug!(%previous, %next, trigger = %self.trigger.id(), "watch rebound");
        }

        self.fragment.render();
    }

    /// Render again without any notification. No-op while unmounted.
    pub fn force_update(&self) {
        if self.is_mounted() {
            self.fragment.render();
        }
    }

    /// Unsubscribe the trigger. Unmounting twice does nothing.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }

        self.source.unsubscribe(&self.trigger);
        self.fragment.phase.set(Phase::Unmounted);
        tracing::debug!(
            source = %self.source.source_id(),
            trigger = %self.trigger.id(),
            "watch unmounted"
        );
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.fragment.phase.get()
    }

    /// Whether the trigger is currently subscribed.
    pub fn is_mounted(&self) -> bool {
        self.phase() == Phase::Mounted
    }

    /// Identity of the currently bound source.
    pub fn source_id(&self) -> SourceId {
        self.source.source_id()
    }

    /// The re-render trigger subscribed while mounted.
    pub fn trigger(&self) -> &Notifier {
        &self.trigger
    }

    /// Number of renders so far, the first display included.
    pub fn render_count(&self) -> usize {
        self.fragment.renders.get()
    }

    /// Borrow the latest output, `None` before the first render.
    pub fn with_view<R>(&self, f: impl FnOnce(Option<&V>) -> R) -> R {
        f(self.fragment.output.borrow().as_ref())
    }
}

impl<V: Clone + 'static> Watch<V> {
    /// Clone the latest output, `None` before the first render.
    pub fn view(&self) -> Option<V> {
        self.fragment.output.borrow().clone()
    }
}

impl<V: 'static> Drop for Watch<V> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<V: 'static> fmt::Debug for Watch<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watch")
            .field("source", &self.source.source_id())
            .field("trigger", &self.trigger.id())
            .field("phase", &self.phase())
            .field("render_count", &self.render_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
