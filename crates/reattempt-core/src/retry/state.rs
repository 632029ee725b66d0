//! Per-run bookkeeping: attempt budget and the evolving interval.

use std::time::Duration;

use super::policy::{Attempts, BackoffPolicy};

/// What to do after a retryable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Budget spent; hand the failure back to the caller.
    Exhausted,
    /// Wait this long, then try again.
    Wait(Duration),
}

/// Mutable state owned by a single executor call. Never shared.
#[derive(Debug, Clone)]
pub struct RetryState {
    remaining: Option<u32>,
    current_interval: Duration,
    attempts: u32,
}

impl RetryState {
    pub fn new<C>(policy: &BackoffPolicy<C>) -> Self {
        let remaining = match policy.max_attempts() {
            Attempts::Bounded(n) => Some(n.get()),
            Attempts::Unbounded => None,
        };
        Self {
            remaining,
            current_interval: policy.initial_interval(),
            attempts: 0,
        }
    }

    /// Count a failed attempt against the budget.
    pub fn record_failure(&mut self) -> Outcome {
        self.attempts = self.attempts.saturating_add(1);
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                return Outcome::Exhausted;
            }
        }
        Outcome::Wait(self.current_interval)
    }

    /// Apply the recurrence after a wait has completed.
    pub fn advance<C>(&mut self, policy: &BackoffPolicy<C>) {
        self.current_interval = policy.next_interval(self.current_interval);
    }

    /// Failed attempts so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn current_interval(&self) -> Duration {
        self.current_interval
    }
}
