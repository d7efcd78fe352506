// app.rs

//! # Application Constants
//!
//! Names, defaults and well-known values shared across the helm-diff commands.

pub const APP_NAME: &str = "helm-diff";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_DESCRIPTION: &str = "Preview helm upgrade changes as a diff";

/// Default logging level; warnings from manifest extraction stay visible.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

pub const HELM_BINARY_NAME: &str = "helm";
pub const HELM_BIN_ENV: &str = "HELM_BIN";
pub const HELM_NAMESPACE_ENV: &str = "HELM_NAMESPACE";
pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Chart version constraint used for `--devel` when no explicit version is given.
pub const DEVEL_VERSION_CONSTRAINT: &str = ">0.0.0-0";

/// Kind added to the suppression list by `--suppress-secrets`.
pub const SECRET_KIND: &str = "Secret";

/// Annotation helm uses to mark hook resources.
pub const HOOK_ANNOTATION: &str = "helm.sh/hook";

/// Sentinel context value meaning "show the full content".
pub const DEFAULT_CONTEXT_STR: &str = "-1";

/// Exit code returned with `--detailed-exitcode` when changes were found.
pub const EXIT_CODE_CHANGES: i32 = 2;

/// Commands that never invoke helm and so skip binary resolution.
pub const EXEMPT_COMMANDS: &[&str] = &["manifests"];
