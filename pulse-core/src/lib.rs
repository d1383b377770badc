//! Pulse Core
//!
//! This crate provides the reactive-state core of the Pulse healthcare portal
//! front-end. It implements:
//!
//! - Value cells that notify their subscribers when written (`Signal`)
//! - Subscription fan-out over several sources (`MergedSignal`, `merge!`)
//! - Scoped subscriptions released on drop (`Effect`)
//! - A binding adapter that re-renders a fragment while mounted (`Watch`)
//!
//! Page layout, navigation and form widgets live elsewhere and only consume
//! this API.
//!
//! # Example
//!
//! ```rust
//! use pulse_core::{merge, Signal, Watch};
//!
//! let first = Signal::new("Ada".to_string());
//! let last = Signal::new("Lovelace".to_string());
//!
//! let (f, l) = (first.clone(), last.clone());
//! let mut greeting = Watch::new(
//!     std::rc::Rc::new(merge![first, last]),
//!     move || format!("{} {}", f.get(), l.get()),
//! );
//!
//! greeting.mount();
//! last.set("Byron".to_string());
//! assert_eq!(greeting.view().as_deref(), Some("Ada Byron"));
//! ```

pub mod reactive;

pub use reactive::{
    merge, Effect, MergedSignal, Notifier, Phase, Signal, SignalError, Source, SourceId,
    SubscriberId, Watch, Watchable,
};
