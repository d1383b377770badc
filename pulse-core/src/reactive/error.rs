//! Errors reported by the fallible signal accessors.

use thiserror::Error;

use super::SourceId;

/// A signal's value could not be borrowed.
///
/// Only the `try_*` accessors on [`Signal`](super::Signal) return this. It
/// means the caller is running inside that same signal's `update` mutator,
/// or is mutating it from inside a `with` closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("signal {id} is being mutated and cannot be read")]
    Borrowed { id: SourceId },

    #[error("signal {id} is borrowed and cannot be mutated")]
    BorrowedMut { id: SourceId },
}

pub type Result<T> = std::result::Result<T, SignalError>;
