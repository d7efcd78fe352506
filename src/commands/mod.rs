// commands/mod.rs

pub mod common_args;
pub mod manifests;
pub mod upgrade;

use crate::commands::common_args::DiffArgs;
use crate::diff::diff_manifests;
use crate::error::AppError;
use crate::manifest::ManifestMapping;

/// Prints the report for `before` against `after` to stdout.
///
/// Returns `AppError::ChangesDetected` when something changed and
/// `--detailed-exitcode` was requested.
pub fn emit_report(
    before: &ManifestMapping,
    after: &ManifestMapping,
    args: &DiffArgs,
    color: bool,
) -> Result<(), AppError> {
    let (report, changed) = diff_manifests(before, after, &args.options(color));
    print!("{}", report);

    if args.detailed_exitcode && changed {
        return Err(AppError::ChangesDetected);
    }
    Ok(())
}
