//! PHP interpreter discovery.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::RunError;
use crate::Result;

/// Binary name searched for on `PATH`.
const BINARY_NAME: &str = if cfg!(windows) { "php.exe" } else { "php" };

/// Environment variables that may point directly at a PHP binary, in
/// lookup order.
const BINARY_VARS: [&str; 3] = ["PHP_BINARY", "PHP_PATH", "PHP_PEAR_PHP_BIN"];

/// Ini files the package manager's own PHP process started with.
const ORIGINAL_INIS_VAR: &str = "COMPOSER_ORIGINAL_INIS";

/// A resolved interpreter and the flags it must be started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub path: PathBuf,
    pub args: Vec<String>,
}

/// Locates a PHP interpreter from an environment snapshot.
///
/// [`InterpreterFinder::from_env`] reads the process environment once; tests
/// build a finder with explicit variables and search path instead.
#[derive(Debug, Clone, Default)]
pub struct InterpreterFinder {
    vars: HashMap<String, OsString>,
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl InterpreterFinder {
    /// Create a finder with no variables and no search path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the relevant parts of the process environment.
    pub fn from_env() -> Self {
        let mut finder = Self {
            search_path: std::env::var_os("PATH"),
            cwd: std::env::current_dir().unwrap_or_default(),
            ..Self::default()
        };
        for key in BINARY_VARS.iter().chain(std::iter::once(&ORIGINAL_INIS_VAR)) {
            if let Some(value) = std::env::var_os(key) {
                finder.vars.insert((*key).to_string(), value);
            }
        }
        finder
    }

    /// Set an environment variable in the snapshot.
    pub fn var(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Set the `PATH`-style search path.
    pub fn search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// Resolve the interpreter binary and its arguments.
    pub fn find(&self) -> Result<Interpreter> {
        let path = self.find_binary().ok_or(RunError::InterpreterNotFound)?;
        let args = self.find_arguments();
        debug!(path = %path.display(), ?args, "resolved PHP interpreter");
        Ok(Interpreter { path, args })
    }

    fn find_binary(&self) -> Option<PathBuf> {
        for key in BINARY_VARS {
            if let Some(value) = self.vars.get(key).filter(|v| !v.is_empty()) {
                let candidate = PathBuf::from(value);
                if is_executable(&candidate) {
                    return Some(candidate);
                }
                debug!(var = key, path = %candidate.display(), "ignoring non-executable PHP path");
            }
        }

        let search_path = self.search_path.as_ref()?;
        which::which_in(BINARY_NAME, Some(search_path), &self.cwd).ok()
    }

    fn find_arguments(&self) -> Vec<String> {
        let ini = self
            .vars
            .get(ORIGINAL_INIS_VAR)
            .and_then(|inis| std::env::split_paths(inis).next())
            .filter(|path| !path.as_os_str().is_empty());

        match ini {
            Some(ini) => vec![format!("--php-ini={}", ini.display())],
            None => Vec::new(),
        }
    }
}

/// Resolve the interpreter from the current process environment.
pub fn resolve_interpreter() -> Result<Interpreter> {
    InterpreterFinder::from_env().find()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
