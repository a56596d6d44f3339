//! script-handler binary entry point.

use std::process::ExitCode;

use script_handler::cli::{self, Args};
use script_handler::{logging, Config, ScriptHandler};
use tracing::{debug, info};

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let config = Config::load(&args).map_err(|e| e.to_string())?;

    if logging::try_init_with(config.log_filter()).is_err() {
        eprintln!("warning: logging already initialized");
    }

    debug!(root = %config.root_dir.display(), timeout = config.process_timeout, "configuration loaded");
    info!("script-handler v{}", env!("CARGO_PKG_VERSION"));

    if args.hooks.is_empty() {
        info!("no hooks requested");
        return Ok(());
    }

    let handler = ScriptHandler::new(config);
    for hook in &args.hooks {
        handler.run_hook(*hook).map_err(|e| e.to_string())?;
    }

    info!(count = args.hooks.len(), "all hooks completed");
    Ok(())
}
