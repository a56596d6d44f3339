//! Command-line interface for script-handler.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::handler::Hook;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Path to composer.json.
    pub composer: Option<PathBuf>,
    /// Per-command timeout in seconds.
    pub timeout: Option<u64>,
    /// Force (`Some(true)`) or disable (`Some(false)`) decorated output.
    pub ansi: Option<bool>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Hooks to run, in order.
    pub hooks: Vec<Hook>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("composer") => {
                result.composer = Some(parser.value()?.parse()?);
            }
            Short('t') | Long("timeout") => {
                let value: String = parser.value()?.parse()?;
                result.timeout = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("timeout", value))?,
                );
            }
            Long("ansi") => {
                result.ansi = Some(true);
            }
            Long("no-ansi") => {
                result.ansi = Some(false);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                let name = val.to_string_lossy().into_owned();
                let hook = name
                    .parse()
                    .map_err(|_| ArgsError::UnknownHook(name.clone()))?;
                result.hooks.push(hook);
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"script-handler {version}
Post-install hooks for framework distributions

USAGE:
    script-handler [OPTIONS] <HOOK>...

HOOKS:
    clear-cache                  Clear (and optionally warm up) the cache
    install-assets               Install bundle assets into the web directory
    define-directory-structure   Directory layout opt-in check

OPTIONS:
    -c, --composer <FILE>   Path to composer.json [default: ./composer.json]
    -t, --timeout <SECS>    Timeout for each console command
        --ansi              Force decorated console output
        --no-ansi           Disable decorated console output
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    PHP_BINARY, PHP_PATH, PHP_PEAR_PHP_BIN
                                Explicit PHP binary
    COMPOSER_ORIGINAL_INIS      Ini files forwarded with --php-ini
    COMPOSER_PROCESS_TIMEOUT    Timeout in seconds (overrides composer.json)
    SENSIOLABS_ENABLE_NEW_DIRECTORY_STRUCTURE
                                Enables the directory structure opt-in
    SCRIPT_HANDLER_LOG_LEVEL    Log level
    RUST_LOG                    Alternative log level setting

EXAMPLES:
    # Typical post-install hook
    script-handler clear-cache install-assets

    # Explicit manifest and a shorter timeout
    script-handler -c /srv/shop/composer.json -t 120 clear-cache
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("script-handler {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Positional argument that names no hook.
    UnknownHook(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnknownHook(hook) => {
                write!(f, "unknown hook: '{}'", hook)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("script-handler")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert!(result.composer.is_none());
        assert!(result.timeout.is_none());
        assert!(result.ansi.is_none());
        assert!(result.hooks.is_empty());
    }

    #[test]
    fn test_hooks_in_order() {
        let result = parse_args_from(args(&["install-assets", "clear-cache"])).unwrap();
        assert_eq!(result.hooks, vec![Hook::InstallAssets, Hook::ClearCache]);
    }

    #[test]
    fn test_unknown_hook() {
        let err = parse_args_from(args(&["warm-everything"])).unwrap_err();
        assert!(matches!(err, ArgsError::UnknownHook(_)));
        assert!(err.to_string().contains("warm-everything"));
    }

    #[test]
    fn test_composer_path() {
        let result = parse_args_from(args(&["-c", "/srv/shop/composer.json"])).unwrap();
        assert_eq!(result.composer, Some(PathBuf::from("/srv/shop/composer.json")));
    }

    #[test]
    fn test_timeout() {
        let result = parse_args_from(args(&["--timeout", "120"])).unwrap();
        assert_eq!(result.timeout, Some(120));
    }

    #[test]
    fn test_invalid_timeout() {
        let result = parse_args_from(args(&["-t", "forever"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_ansi_flags_last_wins() {
        let result = parse_args_from(args(&["--ansi"])).unwrap();
        assert_eq!(result.ansi, Some(true));

        let result = parse_args_from(args(&["--ansi", "--no-ansi"])).unwrap();
        assert_eq!(result.ansi, Some(false));
    }

    #[test]
    fn test_help_and_version() {
        assert!(parse_args_from(args(&["-h"])).unwrap().help);
        assert!(parse_args_from(args(&["--help"])).unwrap().help);
        assert!(parse_args_from(args(&["-V"])).unwrap().version);
    }

    #[test]
    fn test_log_level() {
        let result = parse_args_from(args(&["-l", "debug"])).unwrap();
        assert_eq!(result.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse_args_from(args(&["--port", "80"])).is_err());
    }
}
