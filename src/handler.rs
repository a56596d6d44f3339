//! Post-install hooks.
//!
//! Each hook decides whether it applies to the project, then issues one
//! console command through [`CommandRunner`]. A hook whose directory is
//! missing is skipped with a warning rather than failing the install.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::config::{AssetsInstall, Config};
use crate::execution::{
    CommandRunner, ExecutionRequest, ExecutionResult, InterpreterFinder, OutputChunk,
};
use crate::Result;

/// Environment variable gating the directory structure opt-in.
pub const DIRECTORY_STRUCTURE_VAR: &str = "SENSIOLABS_ENABLE_NEW_DIRECTORY_STRUCTURE";

/// Name of the console entrypoint inside the console directory.
const CONSOLE: &str = "console";

/// A hook that can be requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    ClearCache,
    InstallAssets,
    DefineDirectoryStructure,
}

impl Hook {
    /// Name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClearCache => "clear-cache",
            Self::InstallAssets => "install-assets",
            Self::DefineDirectoryStructure => "define-directory-structure",
        }
    }
}

impl FromStr for Hook {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "clear-cache" => Ok(Self::ClearCache),
            "install-assets" => Ok(Self::InstallAssets),
            "define-directory-structure" => Ok(Self::DefineDirectoryStructure),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs post-install hooks for one project.
pub struct ScriptHandler {
    config: Config,
    finder: InterpreterFinder,
    runner: CommandRunner,
}

impl ScriptHandler {
    /// Create a handler that resolves PHP from the process environment.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            finder: InterpreterFinder::from_env(),
            runner: CommandRunner::new(),
        }
    }

    /// Replace the interpreter finder.
    pub fn with_finder(mut self, finder: InterpreterFinder) -> Self {
        self.finder = finder;
        self
    }

    /// The configuration this handler runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run a single hook.
    pub fn run_hook(&self, hook: Hook) -> Result<()> {
        info!(hook = %hook, "running hook");
        match hook {
            Hook::ClearCache => self.clear_cache().map(drop),
            Hook::InstallAssets => self.install_assets().map(drop),
            Hook::DefineDirectoryStructure => self.define_directory_structure(),
        }
    }

    /// Clear the cache, warming it up only when `cache-warmup` is set.
    ///
    /// Returns `None` when the console directory is missing.
    pub fn clear_cache(&self) -> Result<Option<ExecutionResult>> {
        let Some(console_dir) = self.console_dir("clear the cache") else {
            return Ok(None);
        };

        let args: &[&str] = if self.config.options.cache_warmup {
            &[]
        } else {
            &["--no-warmup"]
        };
        self.execute_command(&console_dir, "cache:clear", args)
            .map(Some)
    }

    /// Install bundle assets into the web directory.
    ///
    /// Returns `None` when assets are disabled or a directory is missing.
    pub fn install_assets(&self) -> Result<Option<ExecutionResult>> {
        let options = &self.config.options;
        if options.assets_install == AssetsInstall::Disabled {
            debug!("asset installation disabled");
            return Ok(None);
        }

        let Some(console_dir) = self.console_dir("install assets") else {
            return Ok(None);
        };
        if !self.has_directory("web-dir", &options.web_dir, "install assets") {
            return Ok(None);
        }

        let web_dir = options.web_dir.to_string_lossy();
        let args: Vec<&str> = options
            .assets_install
            .flags()
            .iter()
            .copied()
            .chain(std::iter::once(&*web_dir))
            .collect();
        self.execute_command(&console_dir, "assets:install", &args)
            .map(Some)
    }

    /// Check the directory structure opt-in.
    ///
    /// Absent or falsy opt-in is a silent no-op. The migration itself is not
    /// performed here.
    pub fn define_directory_structure(&self) -> Result<()> {
        if !self.config.new_directory_structure {
            debug!("directory structure opt-in not enabled");
            return Ok(());
        }

        warn!(
            "{} is set, but directory structure migration is not supported; leaving layout unchanged",
            DIRECTORY_STRUCTURE_VAR
        );
        Ok(())
    }

    /// Whether the project uses the layout with a separate var directory.
    pub fn uses_new_directory_structure(&self) -> bool {
        self.config
            .options
            .var_dir
            .as_deref()
            .is_some_and(|dir| self.config.resolve(dir).is_dir())
    }

    /// Directory holding the console, relative to the project root.
    fn console_dir(&self, action: &str) -> Option<PathBuf> {
        let options = &self.config.options;
        let (key, dir) = if self.uses_new_directory_structure() {
            let bin_dir = options.bin_dir.clone().unwrap_or_else(|| PathBuf::from("bin"));
            ("bin-dir", bin_dir)
        } else {
            ("app-dir", options.app_dir.clone())
        };

        self.has_directory(key, &dir, action).then_some(dir)
    }

    fn has_directory(&self, key: &str, dir: &Path, action: &str) -> bool {
        if self.config.resolve(dir).is_dir() {
            return true;
        }

        warn!(
            "The {} ({}) specified in composer.json was not found in {}, can not {}.",
            key,
            dir.display(),
            self.config.root_dir.display(),
            action
        );
        false
    }

    fn execute_command(
        &self,
        console_dir: &Path,
        command: &str,
        args: &[&str],
    ) -> Result<ExecutionResult> {
        let interpreter = self.finder.find()?;
        let request =
            ExecutionRequest::for_interpreter(&interpreter, console_dir.join(CONSOLE), command)
                .args(args.iter().copied())
                .working_dir(&self.config.root_dir)
                .timeout(self.config.timeout())
                .decorated(self.config.decorated);

        let mut stdout = std::io::stdout();
        self.runner.run(&request, |chunk: &OutputChunk| {
            if let Err(err) = stdout.write_all(&chunk.raw).and_then(|_| stdout.flush()) {
                debug!(error = %err, "failed to relay console output");
            }
        })
    }
}

/// Interpret the opt-in variable: absent, empty, `0`, `false`, `no` and
/// `off` (any case) are all falsy.
pub fn directory_structure_enabled(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None => false,
        Some(v) => !(v.is_empty()
            || v == "0"
            || v.eq_ignore_ascii_case("false")
            || v.eq_ignore_ascii_case("no")
            || v.eq_ignore_ascii_case("off")),
    }
}
