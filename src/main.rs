// main.rs

//! # helm-diff - Main Entry Point
//!
//! This is the main entry point for helm-diff. It initializes the CLI,
//! configures global settings, and dispatches to the `upgrade` and
//! `manifests` commands.
//!
//! ## Global Arguments
//!
//! These arguments can be specified for **any command**.
//!
//! - `--log-level` - The logging level (default: `warn`). Possible values: `error`, `warn`, `info`, `debug`, `trace`.
//! - `--no-color` - Disable colored output.
//! - `--helm-bin` - Path to the helm binary (default: `$HELM_BIN`, then `helm` on `PATH`).
//! - `--kube-context` - Kube context passed to every helm invocation.
//!
//! ## Example Usage
//! ```bash
//! ./helm-diff upgrade my-release ./chart -f values.yaml --suppress-secrets
//! ./helm-diff manifests before.yaml after.yaml --output simple
//! ```
//!
//! For detailed help, use the `--help` flag.

mod app;
mod commands;
mod core;
mod diff;
mod error;
mod globals;
mod helm;
mod manifest;
mod utils;

use std::io::{self, IsTerminal};
use std::process;

use clap::{Arg, ArgAction, Command};
use log::debug;

use crate::app::{APP_DESCRIPTION, APP_NAME, APP_VERSION, DEFAULT_LOG_LEVEL, EXEMPT_COMMANDS, LOG_LEVELS};
use crate::error::{get_helm_path_with_error, AppError};
use crate::utils::logging::initialize_logger;

/// Main function that initializes the CLI and handles command execution.
fn main() {
    let matches = Command::new(APP_NAME)
        .version(APP_VERSION)
        .about(APP_DESCRIPTION)
        // ====================
        // Global Flags
        // ====================
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Set the logging level")
                .global(true)
                .value_parser(clap::builder::PossibleValuesParser::new(LOG_LEVELS))
                .ignore_case(true)
                .default_value(DEFAULT_LOG_LEVEL)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Remove colors from the output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("helm-bin")
                .long("helm-bin")
                .help("Path to the helm binary")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("kube-context")
                .long("kube-context")
                .help("Name of the kubeconfig context to use")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        // ====================
        // Subcommand Definitions
        // ====================
        .subcommand(commands::upgrade::command())
        .subcommand(commands::manifests::command())
        .get_matches();

    // ====================
    // Initialize Logger
    // ====================
    let log_level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or(DEFAULT_LOG_LEVEL);
    initialize_logger(log_level);

    debug!("Logger initialized with level: {}", log_level);

    let no_color = matches.get_flag("no-color");
    if no_color {
        colored::control::set_override(false);
    }
    let color = !no_color && io::stdout().is_terminal();

    // Resolve helm except for commands that never call it
    if !EXEMPT_COMMANDS.contains(&matches.subcommand_name().unwrap_or("")) {
        let explicit = matches.get_one::<String>("helm-bin").map(String::as_str);
        match get_helm_path_with_error(explicit) {
            Ok(helm_path) => {
                debug!("Helm binary: {}", helm_path.display());
                globals::init_globals(helm_path, matches.get_one::<String>("kube-context").cloned());
            }
            Err(e) => exit_with(e),
        }
    }

    // ====================
    // Command Execution
    // ====================
    let result = match matches.subcommand() {
        Some(("upgrade", sub_matches)) => commands::upgrade::execute(sub_matches, color),
        Some(("manifests", sub_matches)) => commands::manifests::execute(sub_matches, color),
        _ => Err(AppError::InvalidArgument(
            "Unknown command. Use --help for usage.".to_string(),
        )),
    };

    if let Err(e) = result {
        exit_with(e);
    }
}

fn exit_with(e: AppError) -> ! {
    print_error!("Error: {}", e);
    process::exit(e.exit_code());
}
