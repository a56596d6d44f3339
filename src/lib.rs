//! # script-handler
//!
//! Post-install hooks for PHP framework distributions.
//!
//! After the package manager installs dependencies, the hooks locate a PHP
//! interpreter and run framework console commands (`cache:clear`,
//! `assets:install`) as child processes. Output is relayed as it arrives and
//! a non-zero exit aborts the install with the sanitized output attached.
//!
//! ## Features
//!
//! - **Interpreter discovery**: `PHP_BINARY`/`PHP_PATH` overrides, then `PATH`
//! - **Argument-vector execution**: no shell in between, escaped command
//!   lines only in diagnostics
//! - **Timeouts**: the child is killed and reaped when it overruns
//! - **Decoration stripping**: error messages never carry ANSI sequences
//!
//! ## Quick Start
//!
//! ```no_run
//! use script_handler::{Config, Hook, ScriptHandler};
//!
//! fn main() -> script_handler::Result<()> {
//!     script_handler::logging::try_init().ok();
//!
//!     let handler = ScriptHandler::new(Config::default());
//!     handler.run_hook(Hook::ClearCache)?;
//!     handler.run_hook(Hook::InstallAssets)?;
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod execution;
pub mod handler;
pub mod logging;
pub mod output;

// Re-export commonly used types
pub use config::{AssetsInstall, Config, Options};
pub use error::{Result, RunError};
pub use execution::{
    resolve_interpreter, CommandRunner, ExecutionRequest, ExecutionResult, Interpreter,
    InterpreterFinder, OutputChunk, OutputSource,
};
pub use handler::{Hook, ScriptHandler};
pub use output::OutputSanitizer;
