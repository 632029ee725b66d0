//! `reattempt run` – run a command until it exits 0 or the policy gives up.

use anyhow::{Context, Result};
use reattempt_core::config::RetryConfig;
use reattempt_core::retry::{retry_call_notify, transient_io, warn_on_retry, Classify};
use std::io;
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Why a single run of the child failed.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Program could not be started (missing binary, permissions, ...).
    #[error("failed to start command: {0}")]
    Spawn(#[source] io::Error),
    #[error("command exited with status {0}")]
    Exit(i32),
    /// Killed by a signal; the number is known on unix only.
    #[error("command was terminated by a signal")]
    Signal(Option<i32>),
}

impl CommandError {
    /// Exit code reattempt itself should use after giving up. A child killed
    /// by signal N is reported as 128 + N, as shells do.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Exit(code) => *code,
            CommandError::Signal(Some(signo)) => 128 + signo,
            CommandError::Spawn(_) | CommandError::Signal(None) => 1,
        }
    }
}

/// Decides which child failures get another attempt.
///
/// With no codes listed every failed exit (and signal) is retried; otherwise
/// only the listed exit codes are. Spawn errors are retried only when the
/// underlying I/O error looks transient.
#[derive(Debug, Clone, Default)]
pub struct ExitClassifier {
    retry_on: Vec<i32>,
}

impl ExitClassifier {
    pub fn new(retry_on: Vec<i32>) -> Self {
        Self { retry_on }
    }
}

impl Classify<CommandError> for ExitClassifier {
    fn is_retryable(&self, error: &CommandError) -> bool {
        match error {
            CommandError::Spawn(e) => transient_io(e),
            CommandError::Exit(code) => self.retry_on.is_empty() || self.retry_on.contains(code),
            CommandError::Signal(_) => self.retry_on.is_empty(),
        }
    }
}

/// Run the program once with inherited stdio.
pub fn run_once(program: &str, args: &[String]) -> Result<(), CommandError> {
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(CommandError::Spawn)?;
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(CommandError::Exit(code)),
        None => Err(CommandError::Signal(signal_of(&status))),
    }
}

#[cfg(unix)]
fn signal_of(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Run `argv` under the given policy; returns the exit code to report.
pub fn run_command(
    retry: &RetryConfig,
    retry_on: Vec<i32>,
    quiet: bool,
    argv: &[String],
) -> Result<i32> {
    let (program, args) = argv.split_first().context("no command given")?;
    let policy = retry
        .to_policy()
        .context("invalid retry policy")?
        .with_classifier(ExitClassifier::new(retry_on));
    tracing::debug!("running {:?} with {:?}", argv, policy);

    let result = retry_call_notify(
        &policy,
        || run_once(program, args),
        |err, wait| {
            if !quiet {
                warn_on_retry(err, wait);
            }
        },
    );
    match result {
        Ok(()) => Ok(0),
        Err(err) => {
            tracing::error!("{} ({})", err, program);
            Ok(err.exit_code())
        }
    }
}
