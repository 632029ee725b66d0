//! Tests for the run and plan command handlers.

use crate::cli::commands::plan::format_plan;
use crate::cli::commands::run::{run_command, CommandError, ExitClassifier};
use reattempt_core::config::RetryConfig;
use reattempt_core::retry::{BackoffPolicy, Classify};
use std::io;
use std::time::Duration;

fn tries(n: i64) -> RetryConfig {
    RetryConfig {
        max_attempts: n,
        ..RetryConfig::default()
    }
}

#[test]
fn classifier_without_codes_retries_any_exit() {
    let c = ExitClassifier::default();
    assert!(c.is_retryable(&CommandError::Exit(1)));
    assert!(c.is_retryable(&CommandError::Exit(255)));
    assert!(c.is_retryable(&CommandError::Signal(Some(15))));
}

#[test]
fn classifier_with_codes_retries_listed_only() {
    let c = ExitClassifier::new(vec![75]);
    assert!(c.is_retryable(&CommandError::Exit(75)));
    assert!(!c.is_retryable(&CommandError::Exit(1)));
    assert!(!c.is_retryable(&CommandError::Signal(Some(15))));
}

#[test]
fn classifier_spawn_errors_by_io_kind() {
    let c = ExitClassifier::default();
    assert!(!c.is_retryable(&CommandError::Spawn(io::Error::from(io::ErrorKind::NotFound))));
    assert!(c.is_retryable(&CommandError::Spawn(io::Error::from(io::ErrorKind::Interrupted))));
}

#[test]
fn exit_codes_reported() {
    assert_eq!(CommandError::Exit(3).exit_code(), 3);
    assert_eq!(CommandError::Signal(Some(9)).exit_code(), 137);
    assert_eq!(CommandError::Signal(None).exit_code(), 1);
}

#[test]
fn missing_program_fails_once() {
    let argv = vec!["reattempt-test-no-such-program".to_string()];
    assert_eq!(run_command(&tries(-1), vec![], true, &argv).unwrap(), 1);
}

#[test]
fn empty_command_is_an_error() {
    assert!(run_command(&tries(1), vec![], true, &[]).is_err());
}

#[test]
fn zero_tries_is_an_error() {
    let argv = vec!["true".to_string()];
    assert!(run_command(&tries(0), vec![], true, &argv).is_err());
}

#[cfg(unix)]
mod unix {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn success_returns_zero() {
        assert_eq!(run_command(&tries(3), vec![], true, &sh("exit 0")).unwrap(), 0);
    }

    #[test]
    fn exhausted_returns_child_code() {
        assert_eq!(run_command(&tries(2), vec![], true, &sh("exit 7")).unwrap(), 7);
    }

    #[test]
    fn killed_child_reports_signal_exit_code() {
        assert_eq!(run_command(&tries(2), vec![], true, &sh("kill -9 $$")).unwrap(), 137);
    }

    #[test]
    fn retries_until_success() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("attempts");
        let script = format!(
            "echo x >> '{}'; [ $(wc -l < '{}') -ge 3 ]",
            log.display(),
            log.display()
        );
        assert_eq!(run_command(&tries(5), vec![], true, &sh(&script)).unwrap(), 0);
        let attempts = std::fs::read_to_string(&log).unwrap().lines().count();
        assert_eq!(attempts, 3);
    }

    #[test]
    fn unlisted_code_is_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("attempts");
        let script = format!("echo x >> '{}'; exit 4", log.display());
        assert_eq!(run_command(&tries(5), vec![75], true, &sh(&script)).unwrap(), 4);
        let attempts = std::fs::read_to_string(&log).unwrap().lines().count();
        assert_eq!(attempts, 1);
    }
}

#[test]
fn plan_lists_bounded_waits() {
    let policy = BackoffPolicy::builder()
        .tries(4)
        .unwrap()
        .initial_interval(Duration::from_secs(1))
        .multiplier(2.0)
        .unwrap()
        .build();
    assert_eq!(
        format_plan(&policy, 10),
        vec![
            "attempt 1 fails, wait 1s",
            "attempt 2 fails, wait 2s",
            "attempt 3 fails, wait 4s",
        ]
    );
}

#[test]
fn plan_truncates_unbounded() {
    let policy = BackoffPolicy::builder()
        .initial_interval(Duration::from_secs(1))
        .addend(Duration::from_secs(1))
        .max_interval(Some(Duration::from_secs(3)))
        .build();
    assert_eq!(
        format_plan(&policy, 4),
        vec![
            "attempt 1 fails, wait 1s",
            "attempt 2 fails, wait 2s",
            "attempt 3 fails, wait 3s",
            "attempt 4 fails, wait 3s",
            "...",
        ]
    );
}

#[test]
fn plan_single_attempt() {
    let policy = BackoffPolicy::builder().tries(1).unwrap().build();
    assert_eq!(format_plan(&policy, 10), vec!["single attempt, no waits"]);
}
