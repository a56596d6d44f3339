//! Console invocation requests.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use super::escape::command_line;
use super::interpreter::Interpreter;

/// Default timeout, matching the package manager's `process-timeout`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Flag appended when the console should emit decorated output.
pub const DECORATION_FLAG: &str = "--ansi";

/// A single console command to run under an interpreter.
///
/// Built once with the chained setters below, then handed by reference to
/// the runner.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    /// Interpreter binary.
    pub interpreter_path: PathBuf,
    /// Interpreter-level flags, placed before the target.
    pub interpreter_args: Vec<String>,
    /// Console entrypoint script.
    pub target_executable: PathBuf,
    /// Console command name, e.g. `cache:clear`.
    pub command_name: String,
    /// Arguments and options for the console command.
    pub command_args: Vec<String>,
    /// Working directory override (if any).
    pub working_dir: Option<PathBuf>,
    /// Maximum wall time before the child is killed; `None` waits forever.
    pub timeout: Option<Duration>,
    /// Whether to ask the console for decorated output.
    pub decorated: bool,
}

impl ExecutionRequest {
    /// Create a request with no extra arguments, the default timeout and no
    /// decoration.
    pub fn new(
        interpreter_path: impl Into<PathBuf>,
        target_executable: impl Into<PathBuf>,
        command_name: impl Into<String>,
    ) -> Self {
        Self {
            interpreter_path: interpreter_path.into(),
            interpreter_args: Vec::new(),
            target_executable: target_executable.into(),
            command_name: command_name.into(),
            command_args: Vec::new(),
            working_dir: None,
            timeout: Some(DEFAULT_TIMEOUT),
            decorated: false,
        }
    }

    /// Create a request for a resolved interpreter, carrying over its flags.
    pub fn for_interpreter(
        interpreter: &Interpreter,
        target_executable: impl Into<PathBuf>,
        command_name: impl Into<String>,
    ) -> Self {
        Self::new(interpreter.path.clone(), target_executable, command_name)
            .interpreter_args(interpreter.args.iter().cloned())
    }

    /// Set the interpreter-level flags.
    pub fn interpreter_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interpreter_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Append an argument to the console command.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.command_args.push(arg.into());
        self
    }

    /// Append several arguments to the console command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set the timeout. A zero duration disables it.
    pub fn timeout(mut self, duration: impl Into<Option<Duration>>) -> Self {
        self.timeout = duration.into().filter(|d| !d.is_zero());
        self
    }

    /// Set the timeout in whole seconds. `0` disables it.
    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }

    /// Set whether output should be decorated.
    pub fn decorated(mut self, decorated: bool) -> Self {
        self.decorated = decorated;
        self
    }

    /// The argument vector handed to the OS, program first.
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(4 + self.interpreter_args.len() + self.command_args.len());
        argv.push(self.interpreter_path.clone().into_os_string());
        argv.extend(self.interpreter_args.iter().map(OsString::from));
        argv.push(self.target_executable.clone().into_os_string());
        argv.push(OsString::from(&self.command_name));
        argv.extend(self.command_args.iter().map(OsString::from));
        if self.decorated {
            argv.push(OsString::from(DECORATION_FLAG));
        }
        argv
    }

    /// Escaped, human-readable form of [`argv`](Self::argv).
    pub fn command_line(&self) -> String {
        command_line(self.argv().iter().map(|arg| arg.to_string_lossy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_new() {
        let request = ExecutionRequest::new("/usr/bin/php", "app/console", "cache:clear");
        assert_eq!(request.interpreter_path, PathBuf::from("/usr/bin/php"));
        assert!(request.interpreter_args.is_empty());
        assert!(request.command_args.is_empty());
        assert!(request.working_dir.is_none());
        assert_eq!(request.timeout, Some(DEFAULT_TIMEOUT));
        assert!(!request.decorated);
    }

    #[test]
    fn test_argv_order() {
        let request = ExecutionRequest::new("/usr/bin/php", "bin/console", "assets:install")
            .interpreter_args(["--php-ini=/etc/php.ini"])
            .args(["--symlink", "web"])
            .decorated(true);

        let argv: Vec<_> = request
            .argv()
            .into_iter()
            .map(|a| a.into_string().unwrap())
            .collect();
        assert_eq!(
            argv,
            vec![
                "/usr/bin/php",
                "--php-ini=/etc/php.ini",
                "bin/console",
                "assets:install",
                "--symlink",
                "web",
                "--ansi",
            ]
        );
    }

    #[test]
    fn test_no_decoration_flag_when_plain() {
        let request = ExecutionRequest::new("php", "app/console", "cache:clear");
        assert!(!request.argv().iter().any(|a| a == DECORATION_FLAG));
    }

    #[test]
    fn test_for_interpreter_copies_args() {
        let interpreter = Interpreter {
            path: PathBuf::from("/opt/php/bin/php"),
            args: vec!["--php-ini=/opt/php/php.ini".to_string()],
        };
        let request = ExecutionRequest::for_interpreter(&interpreter, "app/console", "cache:clear")
            .timeout_secs(60);

        assert_eq!(request.interpreter_path, interpreter.path);
        assert_eq!(request.interpreter_args, interpreter.args);
        assert_eq!(request.timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let request = ExecutionRequest::new("php", "app/console", "cache:clear").timeout_secs(0);
        assert_eq!(request.timeout, None);

        let request = request.timeout(Duration::from_secs(5));
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    #[cfg(unix)]
    fn test_command_line_is_escaped() {
        let request = ExecutionRequest::new("/usr/bin/php", "my project/app/console", "cache:clear")
            .arg("--no-warmup");
        assert_eq!(
            request.command_line(),
            "/usr/bin/php 'my project/app/console' cache:clear --no-warmup"
        );
    }
}
