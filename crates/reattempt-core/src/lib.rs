//! Re-run fallible operations with configurable backoff.
//!
//! ```
//! use reattempt_core::retry::{retry_call, BackoffPolicy};
//! use std::time::Duration;
//!
//! let policy = BackoffPolicy::builder()
//!     .tries(3)?
//!     .initial_interval(Duration::from_millis(1))
//!     .multiplier(2.0)?
//!     .build();
//!
//! let mut calls = 0;
//! let out: Result<u32, String> = retry_call(&policy, || {
//!     calls += 1;
//!     if calls < 3 { Err("not yet".to_string()) } else { Ok(calls) }
//! });
//! assert_eq!(out, Ok(3));
//! # Ok::<(), reattempt_core::retry::PolicyError>(())
//! ```

pub mod config;
pub mod logging;
pub mod retry;
