//! warmstart - application launcher binary
//!
//! Extracts native dependencies in the background, pre-warms application
//! instances, and hands control to the first ready instance.
//!
//! ## Usage
//!
//! ```sh
//! warmstart [--config <path>] [--resource-root <path>] [args...]
//! ```
//!
//! Everything after the options (or after `--`) is forwarded verbatim to the
//! application's run entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use warmstart::{Bootstrap, BootstrapConfig, BringUpState, LogSplash};

// =============================================================================
// CLI Parsing
// =============================================================================

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    resource_root: Option<PathBuf>,
    app_args: Vec<String>,
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut opts = Options::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let value = args.get(i + 1).ok_or("--config requires a path")?;
                opts.config = Some(PathBuf::from(value));
                i += 2;
            }
            "--resource-root" => {
                let value = args.get(i + 1).ok_or("--resource-root requires a path")?;
                opts.resource_root = Some(PathBuf::from(value));
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--" => {
                opts.app_args.extend(args[i + 1..].iter().cloned());
                break;
            }
            _ => {
                // First non-option starts the application argument list.
                opts.app_args.extend(args[i..].iter().cloned());
                break;
            }
        }
    }
    Ok(opts)
}

fn print_help() {
    println!(
        r#"warmstart - pre-warming application launcher

USAGE:
    warmstart [options] [--] [args...]

OPTIONS:
    --config, -c <path>      Configuration file (default: ~/.warmstart/config.json)
    --resource-root <path>   Override the bundled resource root
    --help, -h               Show this help

Application arguments are forwarded verbatim to the run entry point.
"#
    );
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {}", e);
            print_help();
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(&opts) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let bootstrap = match Bootstrap::new(config) {
        Ok(bootstrap) => bootstrap,
        Err(e) => {
            // Unrecognized platform or a dead worker: nothing was started.
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // This binary is the canonical entry point.
    bootstrap.mark_canonical_entry();

    let splash = Arc::new(LogSplash);
    if let Err(e) = bootstrap.start(splash, opts.app_args) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    // Wait until the application has control or bring-up has failed. On
    // failure the splash keeps showing the error; exiting is left to the
    // user closing it, which for this console splash means Ctrl-C.
    let mut state = bootstrap.state();
    let settled = state
        .wait_for(|s| matches!(s, BringUpState::Running | BringUpState::Failed(_)))
        .await;
    match settled.as_deref() {
        Ok(BringUpState::Failed(_)) => {
            tokio::signal::ctrl_c().await.ok();
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn load_config(opts: &Options) -> warmstart::Result<BootstrapConfig> {
    let mut config = match &opts.config {
        Some(path) => BootstrapConfig::load_from(path)?,
        None => BootstrapConfig::load()?,
    };
    if let Some(root) = &opts.resource_root {
        config.resource_root = root.clone();
    }
    Ok(config)
}
