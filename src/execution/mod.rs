//! Console command execution.
//!
//! This module provides:
//! - PHP interpreter discovery
//! - Argument-vector construction and shell escaping for diagnostics
//! - A runner with timeout handling and streaming output
//!
//! # Example
//!
//! ```no_run
//! use script_handler::execution::{resolve_interpreter, CommandRunner, ExecutionRequest};
//!
//! let php = resolve_interpreter()?;
//! let request = ExecutionRequest::for_interpreter(&php, "app/console", "cache:clear")
//!     .arg("--no-warmup")
//!     .timeout_secs(300);
//!
//! CommandRunner::new().run(&request, |chunk| print!("{}", chunk.text))?;
//! # Ok::<(), script_handler::RunError>(())
//! ```

mod escape;
mod interpreter;
mod request;
mod result;
mod runner;

pub use escape::{command_line, ShellEscape};
pub use interpreter::{resolve_interpreter, Interpreter, InterpreterFinder};
pub use request::{ExecutionRequest, DECORATION_FLAG, DEFAULT_TIMEOUT};
pub use result::{ExecutionResult, OutputChunk, OutputSource};
pub use runner::CommandRunner;
