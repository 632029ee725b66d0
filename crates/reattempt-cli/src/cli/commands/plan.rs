//! `reattempt plan` – print the waits a policy would perform.

use anyhow::{Context, Result};
use reattempt_core::config::RetryConfig;
use reattempt_core::retry::BackoffPolicy;

/// One line per wait, at most `limit` lines. An unbounded policy ends with
/// `...` since it never stops on its own.
pub fn format_plan(policy: &BackoffPolicy, limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = policy
        .intervals()
        .take(limit)
        .enumerate()
        .map(|(i, wait)| format!("attempt {} fails, wait {:?}", i + 1, wait))
        .collect();
    if policy.intervals().next().is_none() {
        lines.push("single attempt, no waits".to_string());
    }
    if policy.max_attempts().is_unbounded() || policy.intervals().nth(limit).is_some() {
        lines.push("...".to_string());
    }
    lines
}

pub fn run_plan(retry: &RetryConfig, limit: usize) -> Result<()> {
    let policy = retry.to_policy().context("invalid retry policy")?;
    for line in format_plan(&policy, limit) {
        println!("{}", line);
    }
    Ok(())
}
