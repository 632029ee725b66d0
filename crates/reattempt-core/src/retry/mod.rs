//! Retry and backoff.
//!
//! [`BackoffPolicy`] holds the immutable parameters, [`RetryState`] the per-run
//! counters, and the `retry_call*` functions run the loop. Classifiers decide
//! which failures are retried; sleepers provide the pause between attempts.

mod adapter;
mod classify;
mod error;
mod policy;
mod run;
mod sleep;
mod state;

pub use adapter::Retrying;
pub use classify::{transient_io, Classify, HasKind, Not, OneOf, RetryAll, TransientIo};
pub use error::PolicyError;
pub use policy::{Attempts, BackoffPolicy, BackoffPolicyBuilder, Intervals};
pub use run::{retry_call, retry_call_async, retry_call_notify, retry_call_with, warn_on_retry};
pub use sleep::{RecordingSleeper, Sleeper, ThreadSleeper};
pub use state::{Outcome, RetryState};
