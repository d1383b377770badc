//! Merged sources.
//!
//! A [`MergedSignal`] lets one fragment react to several independent sources
//! through a single subscription. It is a fan-out convenience only: it has no
//! value of its own and does not coalesce notifications, so a subscriber fires
//! once per member change.

use std::fmt;

use super::{Notifier, Source, SourceId, Watchable};

/// A subscription fan-out over a fixed list of sources.
#[derive(Clone)]
pub struct MergedSignal {
    id: SourceId,
    sources: Vec<Source>,
}

impl MergedSignal {
    /// Build a merged source. The member list is fixed from here on.
    pub fn new<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Source>,
    {
        Self {
            id: SourceId::new(),
            sources: sources.into_iter().collect(),
        }
    }

    /// The member sources, in construction order.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Number of member sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the merge has no members.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Watchable for MergedSignal {
    fn source_id(&self) -> SourceId {
        self.id
    }

    fn subscribe(&self, notifier: &Notifier) {
        for source in &self.sources {
            source.subscribe(notifier);
        }
    }

    fn unsubscribe(&self, notifier: &Notifier) {
        for source in &self.sources {
            source.unsubscribe(notifier);
        }
    }
}

impl fmt::Debug for MergedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedSignal")
            .field("id", &self.id)
            .field(
                "sources",
                &self.sources.iter().map(|s| s.source_id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Merge sources into one subscribable handle.
pub fn merge<I>(sources: I) -> MergedSignal
where
    I: IntoIterator<Item = Source>,
{
    MergedSignal::new(sources)
}

/// Merge any mix of watchable handles.
///
/// Each argument is borrowed and erased with
/// [`Watchable::to_source`](crate::reactive::Watchable::to_source), so the
/// caller keeps its own handles.
///
/// ```rust
/// use pulse_core::merge;
/// use pulse_core::reactive::Signal;
///
/// let a = Signal::new(1);
/// let b = Signal::new("x");
/// let both = merge![a, b];
/// assert_eq!(both.len(), 2);
/// ```
#[macro_export]
macro_rules! merge {
    ($($source:expr),* $(,)?) => {
        $crate::reactive::MergedSignal::new(::std::vec![
            $($crate::reactive::Watchable::to_source(&$source)),*
        ])
    };
}
