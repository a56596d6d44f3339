//! Console command runner.

use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::request::ExecutionRequest;
use super::result::{ExecutionResult, OutputChunk};
use crate::error::RunError;
use crate::output::OutputSanitizer;
use crate::Result;

/// Buffer size for reading child output.
const READ_BUFFER_SIZE: usize = 8192;

/// Runs one console command per call.
///
/// Output is forwarded to the sink chunk by chunk as the child produces it.
/// The blocking methods drive a private current-thread runtime and must not
/// be called from inside an async context; use the `_async` variants there.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandRunner;

impl CommandRunner {
    /// Create a new command runner.
    pub fn new() -> Self {
        Self
    }

    /// Run a command, failing with [`RunError::CommandFailed`] on a non-zero
    /// exit.
    pub fn run<F>(&self, request: &ExecutionRequest, sink: F) -> Result<ExecutionResult>
    where
        F: FnMut(&OutputChunk),
    {
        block_on(self.run_async(request, sink))
    }

    /// Run a command and return its result whatever the exit status.
    ///
    /// Timeouts and spawn failures are still errors.
    pub fn execute<F>(&self, request: &ExecutionRequest, sink: F) -> Result<ExecutionResult>
    where
        F: FnMut(&OutputChunk),
    {
        block_on(self.execute_async(request, sink))
    }

    /// Async form of [`run`](Self::run).
    pub async fn run_async<F>(&self, request: &ExecutionRequest, sink: F) -> Result<ExecutionResult>
    where
        F: FnMut(&OutputChunk),
    {
        let result = self.execute_async(request, sink).await?;
        if result.exit_succeeded {
            return Ok(result);
        }

        warn!(
            command = %request.command_name,
            exit_code = ?result.exit_code,
            "console command failed"
        );
        Err(RunError::CommandFailed {
            command: request.command_line(),
            exit_code: result.exit_code,
            stdout: OutputSanitizer::strip_decoration(&result.stdout),
            stderr: OutputSanitizer::strip_decoration(&result.stderr),
        })
    }

    /// Async form of [`execute`](Self::execute).
    pub async fn execute_async<F>(
        &self,
        request: &ExecutionRequest,
        mut sink: F,
    ) -> Result<ExecutionResult>
    where
        F: FnMut(&OutputChunk),
    {
        let argv = request.argv();
        let command_line = request.command_line();
        debug!(command = %command_line, timeout = ?request.timeout, "spawning");

        let mut command = Command::new(&argv[0]);
        command.args(&argv[1..]);
        if let Some(ref dir) = request.working_dir {
            command.current_dir(dir);
        }

        let start = Instant::now();
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let outcome = drive(&mut child, request, &mut sink, &mut stdout, &mut stderr).await;

        let status = match outcome {
            Ok(Some(status)) => status,
            Ok(None) => {
                warn!(command = %command_line, "timed out, killing child");
                reap(&mut child).await;
                return Err(RunError::ExecutionTimedOut {
                    command: command_line,
                    timeout_secs: request.timeout.map_or(0, |t| t.as_secs()),
                });
            }
            Err(err) => {
                reap(&mut child).await;
                return Err(err.into());
            }
        };

        let result = ExecutionResult::new(status.code(), &stdout, &stderr, start.elapsed());
        info!(
            command = %request.command_name,
            exit_code = ?result.exit_code,
            elapsed = ?result.duration,
            "console command finished"
        );
        Ok(result)
    }
}

/// Pump both pipes into the sink until they close, then wait for exit.
///
/// Returns `Ok(None)` when the deadline passes first. Without a timeout the
/// child may run indefinitely.
async fn drive<F>(
    child: &mut Child,
    request: &ExecutionRequest,
    sink: &mut F,
    stdout: &mut Vec<u8>,
    stderr: &mut Vec<u8>,
) -> std::io::Result<Option<ExitStatus>>
where
    F: FnMut(&OutputChunk),
{
    let deadline = request.timeout.map(|t| tokio::time::Instant::now() + t);
    let mut out_pipe = child.stdout.take();
    let mut err_pipe = child.stderr.take();
    let mut out_buf = [0u8; READ_BUFFER_SIZE];
    let mut err_buf = [0u8; READ_BUFFER_SIZE];

    loop {
        tokio::select! {
            read = read_some(&mut out_pipe, &mut out_buf), if out_pipe.is_some() => {
                match read? {
                    0 => out_pipe = None,
                    n => {
                        stdout.extend_from_slice(&out_buf[..n]);
                        sink(&OutputChunk::stdout(&out_buf[..n]));
                    }
                }
            }
            read = read_some(&mut err_pipe, &mut err_buf), if err_pipe.is_some() => {
                match read? {
                    0 => err_pipe = None,
                    n => {
                        stderr.extend_from_slice(&err_buf[..n]);
                        sink(&OutputChunk::stderr(&err_buf[..n]));
                    }
                }
            }
            status = child.wait(), if out_pipe.is_none() && err_pipe.is_none() => {
                return status.map(Some);
            }
            _ = expired(deadline) => {
                return Ok(None);
            }
        }
    }
}

async fn expired(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn read_some<R>(pipe: &mut Option<R>, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    match pipe {
        Some(reader) => reader.read(buf).await,
        None => Ok(0),
    }
}

/// Kill the child if it is still running and wait for it to exit.
async fn reap(child: &mut Child) {
    if let Err(err) = child.kill().await {
        warn!(error = %err, "failed to kill child process");
    }
}

fn block_on<T>(future: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(future)
}
