//! Errors raised while building a backoff policy.
//!
//! The retry loop itself never produces its own error: whatever the operation
//! returned last is what the caller gets back.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    /// A bound of zero would never run the operation.
    #[error("max attempts must be at least 1 (use a negative count for unbounded)")]
    ZeroAttempts,
    #[error("max attempts {0} is out of range")]
    TooManyAttempts(i64),
    #[error("multiplier must be finite and non-negative (got {0})")]
    InvalidMultiplier(f64),
    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    InvalidDuration { field: &'static str, value: f64 },
}
