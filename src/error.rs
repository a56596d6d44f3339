//! Error types for script-handler.

use thiserror::Error;

/// Error raised while running a console command.
///
/// Every variant is fatal to the hook that triggered it; nothing here is
/// retried.
#[derive(Error, Debug)]
pub enum RunError {
    /// No PHP binary could be located on the host.
    #[error("unable to find PHP binary")]
    InterpreterNotFound,

    /// The child outlived its timeout and was killed.
    #[error("the \"{command}\" command exceeded the timeout of {timeout_secs} seconds")]
    ExecutionTimedOut {
        /// Escaped command line of the killed process.
        command: String,
        timeout_secs: u64,
    },

    /// The child exited with a non-zero status.
    ///
    /// `stdout` and `stderr` have already been stripped of decoration.
    #[error("An error occurred when executing the \"{command}\" command:\n\n{stdout}\n\n{stderr}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The child could not be started.
    #[error("failed to start \"{command}\": {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// I/O error while talking to the child.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for script-handler operations.
pub type Result<T> = std::result::Result<T, RunError>;
