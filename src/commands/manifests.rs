// commands/manifests.rs

//! # Manifests Command Module
//!
//! Offline comparison of two rendered manifest files, e.g. the output of two
//! `helm template` runs. No helm binary or cluster is needed. Either side may
//! be `-` to read from stdin.
//!
//! ## Example Usage
//! ```bash
//! helm template web ./chart > before.yaml
//! helm template web ./chart -f prod.yaml | helm-diff manifests before.yaml -
//! ```

use std::fs;
use std::io::{self, Read};

use clap::{Arg, ArgMatches, Command};
use log::{info, warn};

use crate::commands::common_args::{
    context, detailed_exitcode, diff_args_from_matches, namespace, output, suppress,
    suppress_secrets,
};
use crate::commands::emit_report;
use crate::error::AppError;
use crate::manifest::{parse, ManifestMapping};
use crate::utils::display::log_diff_args;

const STDIN_PATH: &str = "-";

/// Configures the `manifests` command for the CLI application.
pub fn command() -> Command {
    Command::new("manifests")
        .about("Compare two rendered manifest files")
        .arg(
            Arg::new("before")
                .required(true)
                .help("Manifest file for the current state, or - for stdin"),
        )
        .arg(
            Arg::new("after")
                .required(true)
                .help("Manifest file for the proposed state, or - for stdin"),
        )
        .arg(namespace())
        .arg(suppress())
        .arg(suppress_secrets())
        .arg(context())
        .arg(output())
        .arg(detailed_exitcode())
}

/// Executes the `manifests` command.
pub fn execute(matches: &ArgMatches, color: bool) -> Result<(), AppError> {
    let diff_args = diff_args_from_matches(matches);
    log_diff_args(&diff_args);

    let before_path = path_arg(matches, "before")?;
    let after_path = path_arg(matches, "after")?;
    if before_path == STDIN_PATH && after_path == STDIN_PATH {
        return Err(AppError::InvalidArgument(
            "only one side can be read from stdin".to_string(),
        ));
    }

    let before = load_mapping(&before_path, &diff_args.namespace)?;
    let after = load_mapping(&after_path, &diff_args.namespace)?;
    emit_report(&before, &after, &diff_args, color)
}

fn path_arg(matches: &ArgMatches, id: &str) -> Result<String, AppError> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| AppError::InvalidArgument(format!("missing {}", id)))
}

/// Reads `path` (or stdin for `-`) and extracts its resources.
pub fn load_mapping(path: &str, namespace: &str) -> Result<ManifestMapping, AppError> {
    let raw = if path == STDIN_PATH {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)?
    };

    let extraction = parse(&raw, namespace);
    if !extraction.warnings.is_empty() {
        warn!(
            "{}: {} document(s) skipped or overridden",
            path,
            extraction.warnings.len()
        );
    }
    info!("{}: {} resource(s)", path, extraction.mapping.len());
    Ok(extraction.mapping)
}
