use std::time::Duration;
use thiserror::Error;

/// Failure to get an exit status out of an external CLI
///
/// A CLI that runs and exits non-zero is not a `ProcessError`; see
/// [`ProcessOutput::ensure_success`](super::ProcessOutput::ensure_success).
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Binary missing; the paths are configurable via `DIRECTRIX_*_PATH`
    #[error("{program} not found, check its configured path")]
    NotFound { program: String },

    #[error("{command} timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Raised by [`MockProcessRunner`](super::MockProcessRunner) for a call nothing was registered for
    #[error("unexpected command: {0}")]
    Unexpected(String),
}
