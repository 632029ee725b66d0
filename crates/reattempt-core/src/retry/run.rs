//! Retry loop: run an operation until it succeeds, fails for good, or the
//! attempt budget is spent.
//!
//! The caller always gets the operation's own error back. Running out of
//! attempts is not an error of its own; the failure from the last attempt is
//! returned unchanged.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use super::classify::Classify;
use super::policy::BackoffPolicy;
use super::sleep::{Sleeper, ThreadSleeper};
use super::state::{Outcome, RetryState};

enum Step {
    GiveUp,
    Wait(Duration),
}

fn on_failure<E, C>(policy: &BackoffPolicy<C>, state: &mut RetryState, err: &E) -> Step
where
    C: Classify<E>,
{
    if !policy.classifier().is_retryable(err) {
        tracing::debug!("attempt {} failed with a non-retryable error", state.attempts() + 1);
        return Step::GiveUp;
    }
    match state.record_failure() {
        Outcome::Exhausted => {
            tracing::debug!("giving up after {} attempts", state.attempts());
            Step::GiveUp
        }
        Outcome::Wait(d) => {
            tracing::debug!("attempt {} failed, next attempt in {:?}", state.attempts(), d);
            Step::Wait(d)
        }
    }
}

/// Runs `op` under `policy`, blocking the thread between attempts and logging
/// each retry as a warning.
pub fn retry_call<T, E, C, F>(policy: &BackoffPolicy<C>, op: F) -> Result<T, E>
where
    E: fmt::Display,
    C: Classify<E>,
    F: FnMut() -> Result<T, E>,
{
    retry_call_with(policy, &ThreadSleeper, op, warn_on_retry)
}

/// Like [`retry_call`], but calls `on_retry(&error, wait)` before each wait
/// instead of logging.
pub fn retry_call_notify<T, E, C, F, N>(
    policy: &BackoffPolicy<C>,
    op: F,
    on_retry: N,
) -> Result<T, E>
where
    C: Classify<E>,
    F: FnMut() -> Result<T, E>,
    N: FnMut(&E, Duration),
{
    retry_call_with(policy, &ThreadSleeper, op, on_retry)
}

/// The retry loop with an explicit [`Sleeper`].
///
/// `on_retry` runs on the calling thread before every wait; if it panics the
/// panic unwinds out of this function and no further attempts are made.
pub fn retry_call_with<T, E, C, S, F, N>(
    policy: &BackoffPolicy<C>,
    sleeper: &S,
    mut op: F,
    mut on_retry: N,
) -> Result<T, E>
where
    C: Classify<E>,
    S: Sleeper + ?Sized,
    F: FnMut() -> Result<T, E>,
    N: FnMut(&E, Duration),
{
    let mut state = RetryState::new(policy);
    loop {
        let err = match op() {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        match on_failure(policy, &mut state, &err) {
            Step::GiveUp => return Err(err),
            Step::Wait(d) => {
                on_retry(&err, d);
                sleeper.sleep(d);
                state.advance(policy);
            }
        }
    }
}

/// Async flavour: waits with `tokio::time::sleep`, so other tasks keep
/// running while this one backs off. Must be polled inside a tokio runtime.
pub async fn retry_call_async<T, E, C, F, Fut, N>(
    policy: &BackoffPolicy<C>,
    mut op: F,
    mut on_retry: N,
) -> Result<T, E>
where
    C: Classify<E>,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    N: FnMut(&E, Duration),
{
    let mut state = RetryState::new(policy);
    loop {
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        match on_failure(policy, &mut state, &err) {
            Step::GiveUp => return Err(err),
            Step::Wait(d) => {
                on_retry(&err, d);
                tokio::time::sleep(d).await;
                state.advance(policy);
            }
        }
    }
}

/// Default retry notification: one warning per failed attempt.
pub fn warn_on_retry<E: fmt::Display>(err: &E, wait: Duration) {
    tracing::warn!("encountered an error: {}, retrying in {:?}", err, wait);
}
