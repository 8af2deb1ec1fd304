// error.rs — Error types for external command invocation.

use thiserror::Error;

/// Errors that can occur while invoking an external command.
///
/// A command that runs and exits non-zero is *not* an error here — callers
/// inspect [`crate::CommandOutput`] for that. These variants cover the cases
/// where no process ran at all.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The program is not installed or not on PATH.
    #[error("command not found: {program}")]
    NotFound { program: String },

    /// The process could not be spawned for some other reason.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}
