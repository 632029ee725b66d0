//! Decide which failures are worth another attempt.
//!
//! A classifier is anything implementing [`Classify`]: the provided
//! [`RetryAll`], [`OneOf`], [`Not`] and [`TransientIo`], or a plain closure
//! `Fn(&E) -> bool`.

use std::io;

/// Answers "is this failure retryable?".
pub trait Classify<E> {
    fn is_retryable(&self, error: &E) -> bool;
}

impl<E, F> Classify<E> for F
where
    F: Fn(&E) -> bool,
{
    fn is_retryable(&self, error: &E) -> bool {
        self(error)
    }
}

/// Every failure is retryable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryAll;

impl<E> Classify<E> for RetryAll {
    fn is_retryable(&self, _error: &E) -> bool {
        true
    }
}

/// Error types that can report a coarse kind, e.g. a fieldless enum or
/// `std::io::ErrorKind`. Lets [`OneOf`] match on kinds instead of values.
pub trait HasKind {
    type Kind: PartialEq;

    fn kind(&self) -> Self::Kind;
}

impl HasKind for io::Error {
    type Kind = io::ErrorKind;

    fn kind(&self) -> io::ErrorKind {
        io::Error::kind(self)
    }
}

/// Retry only failures whose kind is in the set.
#[derive(Debug, Clone, PartialEq)]
pub struct OneOf<K> {
    kinds: Vec<K>,
}

impl<K> OneOf<K> {
    pub fn new(kinds: impl IntoIterator<Item = K>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }
}

impl<E> Classify<E> for OneOf<E::Kind>
where
    E: HasKind,
{
    fn is_retryable(&self, error: &E) -> bool {
        let kind = error.kind();
        self.kinds.iter().any(|k| *k == kind)
    }
}

/// Inverts a classifier: retry everything the inner one rejects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Not<C>(pub C);

impl<E, C> Classify<E> for Not<C>
where
    C: Classify<E>,
{
    fn is_retryable(&self, error: &E) -> bool {
        !self.0.is_retryable(error)
    }
}

/// Whether an I/O error is likely to go away on its own (timeouts, resets,
/// interrupted calls). Missing files, permissions and bad input are not.
pub fn transient_io(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}

/// Classifier form of [`transient_io`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransientIo;

impl Classify<io::Error> for TransientIo {
    fn is_retryable(&self, error: &io::Error) -> bool {
        transient_io(error)
    }
}
