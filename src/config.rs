//! Configuration management for script-handler.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `composer.json` (`extra` options and `config.process-timeout`)
//! 4. Default values

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::handler::{directory_structure_enabled, DIRECTORY_STRUCTURE_VAR};

/// Manifest looked up in the working directory when none is given.
pub const DEFAULT_MANIFEST: &str = "composer.json";

/// Default process timeout in seconds.
pub const DEFAULT_PROCESS_TIMEOUT: u64 = 300;

/// Effective configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root; relative directories in [`Options`] are resolved here.
    pub root_dir: PathBuf,
    /// Hook options from the manifest's `extra` section.
    pub options: Options,
    /// Timeout for each console command, in seconds. `0` disables it.
    pub process_timeout: u64,
    /// Whether console output should be decorated.
    pub decorated: bool,
    /// Directory structure opt-in, from the environment.
    pub new_directory_structure: bool,
    /// Logging configuration.
    pub logging: LoggingSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            options: Options::default(),
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            decorated: false,
            new_directory_structure: false,
            logging: LoggingSection::default(),
        }
    }
}

/// Flat option map read from `extra`.
///
/// Unknown keys are ignored. Each key is also accepted with the `symfony-`
/// prefix used by older manifests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    /// Application directory; holds the console in the classic layout.
    #[serde(alias = "symfony-app-dir")]
    pub app_dir: PathBuf,
    /// Public web directory assets are installed into.
    #[serde(alias = "symfony-web-dir")]
    pub web_dir: PathBuf,
    /// Directory holding the console in the new layout.
    #[serde(alias = "symfony-bin-dir", skip_serializing_if = "Option::is_none")]
    pub bin_dir: Option<PathBuf>,
    /// Var directory; its presence selects the new layout.
    #[serde(alias = "symfony-var-dir", skip_serializing_if = "Option::is_none")]
    pub var_dir: Option<PathBuf>,
    /// How assets are installed.
    #[serde(alias = "symfony-assets-install")]
    pub assets_install: AssetsInstall,
    /// Warm the cache up after clearing it.
    #[serde(alias = "symfony-cache-warmup")]
    pub cache_warmup: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            app_dir: PathBuf::from("app"),
            web_dir: PathBuf::from("web"),
            bin_dir: None,
            var_dir: None,
            assets_install: AssetsInstall::Hard,
            cache_warmup: false,
        }
    }
}

/// Asset installation mode: `"hard"`, `"symlink"`, `"relative"` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "AssetsInstallValue", into = "AssetsInstallValue")]
pub enum AssetsInstall {
    /// Copy files.
    #[default]
    Hard,
    /// Absolute symlinks.
    Symlink,
    /// Relative symlinks.
    Relative,
    /// Do not install assets.
    Disabled,
}

impl AssetsInstall {
    /// Flags passed to `assets:install`.
    pub fn flags(&self) -> &'static [&'static str] {
        match self {
            Self::Hard | Self::Disabled => &[],
            Self::Symlink => &["--symlink"],
            Self::Relative => &["--symlink", "--relative"],
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AssetsInstallValue {
    Flag(bool),
    Mode(String),
}

impl TryFrom<AssetsInstallValue> for AssetsInstall {
    type Error = String;

    fn try_from(value: AssetsInstallValue) -> Result<Self, Self::Error> {
        match value {
            AssetsInstallValue::Flag(false) => Ok(Self::Disabled),
            AssetsInstallValue::Flag(true) => Ok(Self::Hard),
            AssetsInstallValue::Mode(mode) => match mode.as_str() {
                "hard" => Ok(Self::Hard),
                "symlink" => Ok(Self::Symlink),
                "relative" => Ok(Self::Relative),
                other => Err(format!("invalid assets-install mode: '{}'", other)),
            },
        }
    }
}

impl From<AssetsInstall> for AssetsInstallValue {
    fn from(mode: AssetsInstall) -> Self {
        match mode {
            AssetsInstall::Hard => Self::Mode("hard".into()),
            AssetsInstall::Symlink => Self::Mode("symlink".into()),
            AssetsInstall::Relative => Self::Mode("relative".into()),
            AssetsInstall::Disabled => Self::Flag(false),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log filter (error, warn, info, debug, trace, or an `EnvFilter` directive).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "script_handler=info".to_string(),
        }
    }
}

/// The parts of `composer.json` this tool reads.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Manifest {
    extra: Options,
    config: ManifestConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct ManifestConfig {
    process_timeout: u64,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
        }
    }
}

impl Config {
    /// Load configuration from a `composer.json` file.
    ///
    /// The file's directory becomes the project root.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let manifest: Manifest = serde_json::from_str(&content).map_err(ConfigError::Json)?;

        let root_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            root_dir,
            options: manifest.extra,
            process_timeout: manifest.config.process_timeout,
            ..Self::default()
        })
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(timeout) = lookup("COMPOSER_PROCESS_TIMEOUT") {
            if let Ok(timeout) = timeout.trim().parse() {
                self.process_timeout = timeout;
            }
        }

        self.new_directory_structure =
            directory_structure_enabled(lookup(DIRECTORY_STRUCTURE_VAR).as_deref());

        if let Some(level) = lookup("SCRIPT_HANDLER_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(timeout) = args.timeout {
            self.process_timeout = timeout;
        }

        if let Some(ansi) = args.ansi {
            self.decorated = ansi;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > composer.json > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.composer {
            Some(ref path) => Config::from_file(path)?,
            None if Path::new(DEFAULT_MANIFEST).is_file() => {
                Config::from_file(Path::new(DEFAULT_MANIFEST))?
            }
            None => Config::default(),
        };

        config.decorated = std::io::stdout().is_terminal();

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Resolve a project-relative directory against the root.
    pub fn resolve(&self, dir: &Path) -> PathBuf {
        self.root_dir.join(dir)
    }

    /// Timeout for each console command, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.process_timeout > 0).then(|| Duration::from_secs(self.process_timeout))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading the manifest.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read composer.json: {}", e),
            Self::Json(e) => write!(f, "failed to parse composer.json: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
