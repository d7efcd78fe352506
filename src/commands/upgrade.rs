// commands/upgrade.rs

//! # Upgrade Command Module
//!
//! This module provides the `upgrade` command: show a diff explaining what a
//! `helm upgrade` would change. It fetches the currently deployed version of
//! a release and compares it to a dry-run render of a chart plus values.
//!
//! ## Features
//! - Passes chart version and value overrides straight through to helm.
//! - Diffs against an empty baseline with `--allow-unreleased`.
//! - Hooks are compared alongside regular templates; `helm test` hooks only
//!   with `--include-tests`.
//!
//! ## Example Usage
//! ```bash
//! helm diff upgrade my-release stable/postgresql --values values.yaml
//! ```

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{debug, info};

use crate::commands::common_args::{
    context, detailed_exitcode, diff_args_from_matches, env_args_from_matches, env_file, env_var,
    namespace, output, suppress, suppress_secrets,
};
use crate::commands::emit_report;
use crate::core::env::load_env_vars;
use crate::core::values::ValueOptions;
use crate::error::AppError;
use crate::helm::{HelmCli, ReleaseSource, RenderedRelease, UpgradeRequest};
use crate::manifest::{parse, ManifestMapping};
use crate::utils::display::{log_diff_args, print_unicode_box};

const LONG_ABOUT: &str = "Show a diff explaining what a helm upgrade would change.

This fetches the currently deployed version of a release
and compares it to a chart plus values.
This can be used to visualize what changes a helm upgrade will
perform.";

/// Configures the `upgrade` command for the CLI application.
pub fn command() -> Command {
    Command::new("upgrade")
        .about("Show a diff explaining what a helm upgrade would change")
        .long_about(LONG_ABOUT)
        .arg(Arg::new("release").required(true).help("Release name"))
        .arg(Arg::new("chart").required(true).help("Chart reference or path"))
        .arg(
            Arg::new("version")
                .long("version")
                .help("Exact chart version to use; the latest version is used if unset"),
        )
        .arg(
            Arg::new("devel")
                .long("devel")
                .help("Use development versions too (equivalent to version '>0.0.0-0'); ignored if --version is set")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("values")
                .short('f')
                .long("values")
                .help("Specify values in a YAML file (can specify multiple)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .help("Set values on the command line (can specify multiple or separate values with commas: key1=val1,key2=val2)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("set-string")
                .long("set-string")
                .help("Set STRING values on the command line (can specify multiple or separate values with commas: key1=val1,key2=val2)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("reuse-values")
                .long("reuse-values")
                .help("Reuse the last release's values and merge in any new values")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("reset-values")
                .long("reset-values")
                .help("Reset the values to the ones built into the chart and merge in any new values")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("allow-unreleased")
                .long("allow-unreleased")
                .help("Enables diffing of releases that are not yet deployed via Helm")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("include-tests")
                .long("include-tests")
                .help("Include helm test hooks in the diff")
                .action(ArgAction::SetTrue),
        )
        .arg(env_file())
        .arg(env_var())
        .arg(namespace())
        .arg(suppress())
        .arg(suppress_secrets())
        .arg(context())
        .arg(output())
        .arg(detailed_exitcode())
}

/// Collects the chart and values options from the matches.
fn value_options_from_matches(matches: &ArgMatches) -> ValueOptions {
    let many = |id: &str| -> Vec<String> {
        matches
            .get_many::<String>(id)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    };

    ValueOptions {
        value_files: many("values"),
        values: many("set"),
        string_values: many("set-string"),
        reuse_values: matches.get_flag("reuse-values"),
        reset_values: matches.get_flag("reset-values"),
        version: matches.get_one::<String>("version").cloned(),
        devel: matches.get_flag("devel"),
    }
}

/// Executes the `upgrade` command.
pub fn execute(matches: &ArgMatches, color: bool) -> Result<(), AppError> {
    let diff_args = diff_args_from_matches(matches);
    log_diff_args(&diff_args);

    let request = UpgradeRequest {
        release: required(matches, "release")?,
        chart: required(matches, "chart")?,
        namespace: diff_args.namespace.clone(),
        values: value_options_from_matches(matches),
    };

    let (env_file, overrides) = env_args_from_matches(matches);
    let client = HelmCli::from_globals(load_env_vars(&env_file, &overrides)?)?;

    let (before, after) = collect_mappings(
        &client,
        &request,
        matches.get_flag("allow-unreleased"),
        matches.get_flag("include-tests"),
    )?;

    emit_report(&before, &after, &diff_args, color)
}

fn required(matches: &ArgMatches, id: &str) -> Result<String, AppError> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| AppError::InvalidArgument(format!("missing {}", id)))
}

/// Obtains the before/after mappings for `request`.
///
/// A release helm does not know is an error unless `allow_unreleased` is
/// set, in which case the before side is empty and the after side is a
/// dry-run install.
pub fn collect_mappings<S: ReleaseSource>(
    source: &S,
    request: &UpgradeRequest,
    allow_unreleased: bool,
    include_tests: bool,
) -> Result<(ManifestMapping, ManifestMapping), AppError> {
    request.values.validate()?;

    let extract = |release: &RenderedRelease| {
        let namespace = if release.namespace.is_empty() {
            request.namespace.as_str()
        } else {
            release.namespace.as_str()
        };
        debug!(
            "Extracting {} ({} hooks) in namespace {}",
            release.name,
            release.hooks.len(),
            namespace
        );
        let mapping = parse(&release.combined_manifest(), namespace).mapping;
        if include_tests {
            mapping
        } else {
            mapping.without_test_hooks()
        }
    };

    match source.current_release(&request.release, &request.namespace)? {
        Some(current) => {
            let upgraded = source.upgrade_dry_run(request)?;
            info!(
                "Comparing release {} against a dry-run upgrade of {}",
                request.release, request.chart
            );
            Ok((extract(&current), extract(&upgraded)))
        }
        None if allow_unreleased => {
            print_unicode_box(
                "Release was not present in Helm.\nDiff will show entire contents as new.",
            );
            let installed = source.install_dry_run(request)?;
            Ok((ManifestMapping::empty(), extract(&installed)))
        }
        None => {
            print_unicode_box(
                "Release was not present in Helm.\nInclude the `--allow-unreleased` to perform diff without exiting in error.",
            );
            Err(AppError::ReleaseNotFound(request.release.clone()))
        }
    }
}
