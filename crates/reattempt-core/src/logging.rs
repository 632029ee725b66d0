//! Logging init: stderr by default, or an append-only file under the XDG state dir.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,reattempt_core=info,reattempt=info";
const FILE_FILTER: &str = "info,reattempt_core=debug,reattempt=debug";

/// Where log records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogTarget {
    /// Human-facing stderr, next to the child's own output.
    #[default]
    Stderr,
    /// `~/.local/state/reattempt/reattempt.log`.
    StateFile,
}

/// Writer that is either the log file or stderr (used when the file handle can't be cloned).
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Path of the log file used by [`LogTarget::StateFile`]; parent dirs are created.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("reattempt")?;
    Ok(xdg_dirs.place_state_file("reattempt.log")?)
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
/// Falls back to stderr if the state file can't be opened.
pub fn init(target: LogTarget) {
    match target {
        LogTarget::Stderr => init_logging_stderr(),
        LogTarget::StateFile => {
            if let Err(err) = init_logging() {
                init_logging_stderr();
                tracing::warn!("log file unavailable ({:#}), logging to stderr", err);
            }
        }
    }
}

/// Initialize logging to the XDG state file. Returns Err before installing
/// anything if the file can't be opened, so the caller can fall back.
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(FILE_FILTER))
        .with_writer(BoxMakeWriter::new(FileMakeWriter(file)))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!("reattempt logging initialized at {}", path.display());
    Ok(())
}

/// Initialize compact logging to stderr.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
