//! Reactive Primitives
//!
//! This module implements the signal/observer core: value cells, merged
//! sources, scoped subscriptions and the binding adapter that ties a
//! rendered fragment to a source.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state plus an ordered set of
//! notifiers. Writing through the signal runs a synchronous notification
//! pass over every notifier subscribed at that moment.
//!
//! ## Merged signals
//!
//! A MergedSignal fans subscriptions out to several sources. It has no value
//! of its own and never coalesces notifications.
//!
//! ## Effects
//!
//! An Effect owns one subscription and releases it when dropped.
//!
//! ## Watch
//!
//! A Watch is the UI-side adapter: it subscribes a re-render trigger on
//! mount, moves it when the bound source changes and removes it on unmount.
//!
//! # Implementation Notes
//!
//! Subscriptions are explicit. Unlike frameworks with automatic dependency
//! tracking, reading a signal never registers anything; a fragment re-renders
//! only for the sources its Watch is bound to.
//!
//! Everything here is single-threaded. Handles are `Rc`-based and values sit
//! in `RefCell`s, so none of the types are `Send`.

mod effect;
mod error;
mod merged;
mod signal;
mod source;
mod subscriber;
mod watch;

pub use effect::Effect;
pub use error::{Result, SignalError};
pub use merged::{merge, MergedSignal};
pub use signal::Signal;
pub use source::{Source, SourceId, Watchable};
pub use subscriber::{Notifier, SubscriberId};
pub use watch::{Phase, Watch};
