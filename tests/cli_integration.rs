//! CLI integration tests.
//!
//! These tests verify argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use script_handler::cli::{parse_args_from, Args};
use script_handler::config::Config;
use script_handler::{AssetsInstall, Hook};

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("script-handler")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

fn manifest(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-c",
        "/srv/shop/composer.json",
        "-t",
        "90",
        "--no-ansi",
        "-l",
        "debug",
        "clear-cache",
        "install-assets",
    ]))
    .unwrap();

    assert_eq!(result.composer, Some(PathBuf::from("/srv/shop/composer.json")));
    assert_eq!(result.timeout, Some(90));
    assert_eq!(result.ansi, Some(false));
    assert_eq!(result.log_level, Some("debug".to_string()));
    assert_eq!(result.hooks, vec![Hook::ClearCache, Hook::InstallAssets]);
}

#[test]
fn test_cli_options_after_hooks() {
    let result = parse_args_from(args(&["define-directory-structure", "--ansi"])).unwrap();
    assert_eq!(result.hooks, vec![Hook::DefineDirectoryStructure]);
    assert_eq!(result.ansi, Some(true));
}

#[test]
fn test_cli_rejects_console_command_names() {
    let result = parse_args_from(args(&["cache:clear"]));
    assert!(result.is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_manifest() {
    let file = manifest(
        r#"{
            "name": "acme/shop",
            "scripts": {
                "post-install-cmd": ["script-handler clear-cache install-assets"]
            },
            "extra": {
                "symfony-app-dir": "app",
                "symfony-web-dir": "web",
                "symfony-assets-install": "relative",
                "incenteev-parameters": { "file": "app/config/parameters.yml" }
            },
            "config": { "process-timeout": 900 }
        }"#,
    );

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.options.assets_install, AssetsInstall::Relative);
    assert_eq!(config.process_timeout, 900);
}

#[test]
fn test_config_priority_cli_over_file() {
    let file = manifest(r#"{"config": {"process-timeout": 900}}"#);

    let args = Args {
        composer: Some(file.path().to_path_buf()),
        timeout: Some(15),
        ansi: Some(true),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    assert_eq!(config.process_timeout, 15);
    assert!(config.decorated);
    assert_eq!(config.root_dir, file.path().parent().unwrap());
}

#[test]
fn test_config_no_ansi_wins() {
    let file = manifest("{}");
    let args = Args {
        ansi: Some(false),
        composer: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    assert!(!config.decorated);
}

#[test]
fn test_config_explicit_missing_manifest() {
    let args = Args {
        composer: Some(PathBuf::from("/nonexistent/composer.json")),
        ..Args::default()
    };

    let err = Config::load(&args).unwrap_err();
    assert!(err.to_string().contains("failed to read composer.json"));
}
