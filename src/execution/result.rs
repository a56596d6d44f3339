//! Execution result types.

use std::time::Duration;

/// Outcome of a console command that ran to completion.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    /// Whether the child exited with status 0.
    pub exit_succeeded: bool,
    /// Exit code, `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output, as received.
    pub stdout: String,
    /// Captured standard error, as received.
    pub stderr: String,
    /// Wall time from spawn to exit.
    pub duration: Duration,
}

impl ExecutionResult {
    /// Create a result from captured output.
    pub fn new(exit_code: Option<i32>, stdout: &[u8], stderr: &[u8], duration: Duration) -> Self {
        Self {
            exit_succeeded: exit_code == Some(0),
            exit_code,
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
            duration,
        }
    }
}

/// Piece of output delivered to the sink while the child runs.
#[derive(Debug, Clone)]
pub struct OutputChunk {
    /// Raw bytes, decoration included.
    pub raw: Vec<u8>,
    /// Decoded text (best effort).
    pub text: String,
    /// Stream the bytes came from.
    pub source: OutputSource,
}

/// Source of output data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSource {
    Stdout,
    Stderr,
}

impl OutputChunk {
    /// Create a new output chunk.
    pub fn new(raw: &[u8], source: OutputSource) -> Self {
        Self {
            raw: raw.to_vec(),
            text: String::from_utf8_lossy(raw).into_owned(),
            source,
        }
    }

    /// Create a stdout chunk.
    pub fn stdout(raw: &[u8]) -> Self {
        Self::new(raw, OutputSource::Stdout)
    }

    /// Create a stderr chunk.
    pub fn stderr(raw: &[u8]) -> Self {
        Self::new(raw, OutputSource::Stderr)
    }
}
