//! Bind a function to a fixed policy so call sites only pass arguments.

use std::fmt;
use std::time::Duration;

use super::classify::{Classify, RetryAll};
use super::policy::BackoffPolicy;
use super::run::{retry_call, retry_call_notify};

/// A fallible function paired with the policy it should always be retried
/// under. Each attempt receives the same borrowed arguments.
#[derive(Debug, Clone)]
pub struct Retrying<F, C = RetryAll> {
    policy: BackoffPolicy<C>,
    f: F,
}

impl<F, C> Retrying<F, C> {
    pub fn new(policy: BackoffPolicy<C>, f: F) -> Self {
        Self { policy, f }
    }

    pub fn policy(&self) -> &BackoffPolicy<C> {
        &self.policy
    }

    /// Call with retries, logging each retry as a warning.
    pub fn call<A, T, E>(&mut self, args: &A) -> Result<T, E>
    where
        A: ?Sized,
        E: fmt::Display,
        C: Classify<E>,
        F: FnMut(&A) -> Result<T, E>,
    {
        let f = &mut self.f;
        retry_call(&self.policy, || f(args))
    }

    /// Call with retries, reporting each retry to `on_retry`.
    pub fn call_notify<A, T, E, N>(&mut self, args: &A, on_retry: N) -> Result<T, E>
    where
        A: ?Sized,
        C: Classify<E>,
        F: FnMut(&A) -> Result<T, E>,
        N: FnMut(&E, Duration),
    {
        let f = &mut self.f;
        retry_call_notify(&self.policy, || f(args), on_retry)
    }
}
