//! CLI for reattempt.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use reattempt_core::config::{self, RetryConfig};
use reattempt_core::logging::{self, LogTarget};

use commands::{run_command, run_plan};

/// Top-level CLI: run a command until it succeeds, with backoff.
#[derive(Debug, Parser)]
#[command(name = "reattempt")]
#[command(about = "Re-run a failing command with configurable backoff", long_about = None)]
pub struct Cli {
    /// Log to ~/.local/state/reattempt/reattempt.log instead of stderr.
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Backoff parameters. Anything left unset comes from config.toml.
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct PolicyArgs {
    /// Maximum attempts including the first; negative = retry forever.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub tries: Option<i64>,

    /// Seconds to wait before the second attempt.
    #[arg(long, value_name = "SECS")]
    pub interval: Option<f64>,

    /// Factor applied to the wait after each failure.
    #[arg(long, value_name = "X")]
    pub multiplier: Option<f64>,

    /// Seconds added to the wait after each failure (after the multiplier).
    #[arg(long, value_name = "SECS")]
    pub addend: Option<f64>,

    /// Upper bound on the wait, in seconds.
    #[arg(long, value_name = "SECS")]
    pub max_interval: Option<f64>,
}

impl PolicyArgs {
    /// Overlay command-line values on the configured defaults.
    pub fn merge(&self, base: &RetryConfig) -> RetryConfig {
        RetryConfig {
            max_attempts: self.tries.unwrap_or(base.max_attempts),
            interval_secs: self.interval.unwrap_or(base.interval_secs),
            multiplier: self.multiplier.unwrap_or(base.multiplier),
            addend_secs: self.addend.unwrap_or(base.addend_secs),
            max_interval_secs: self.max_interval.or(base.max_interval_secs),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run a command, retrying on failure.
    ///
    /// When retries run out, reattempt exits with the command's last exit
    /// code, or 128 + N if it was killed by signal N.
    Run {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Only retry these exit codes (repeatable). Default: retry any failure.
        #[arg(long = "retry-on", value_name = "CODE")]
        retry_on: Vec<i32>,

        /// Don't log a warning for each failed attempt.
        #[arg(long, short)]
        quiet: bool,

        /// Program and arguments, after `--`.
        #[arg(last = true, required = true, value_name = "COMMAND")]
        command: Vec<String>,
    },

    /// Print the waits a policy would perform.
    Plan {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Maximum number of waits to print.
        #[arg(long, default_value = "10", value_name = "N")]
        limit: usize,
    },
}

impl CliCommand {
    /// Parse arguments, run the subcommand and return the process exit code.
    pub fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        logging::init(if cli.log_file {
            LogTarget::StateFile
        } else {
            LogTarget::Stderr
        });

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                policy,
                retry_on,
                quiet,
                command,
            } => run_command(&policy.merge(&cfg.retry), retry_on, quiet, &command),
            CliCommand::Plan { policy, limit } => {
                run_plan(&policy.merge(&cfg.retry), limit)?;
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests;
