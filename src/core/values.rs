// core/values.rs

//! # Chart and Values Options
//!
//! The chart version and value overrides of an upgrade. Merging is left to
//! helm; this module only validates the inputs and turns them into helm
//! arguments.

use std::path::Path;

use crate::app::DEVEL_VERSION_CONSTRAINT;
use crate::error::AppError;

/// Value sources and chart selection passed through to helm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueOptions {
    /// `-f/--values` files; `-` reads stdin.
    pub value_files: Vec<String>,
    /// `--set` expressions.
    pub values: Vec<String>,
    /// `--set-string` expressions.
    pub string_values: Vec<String>,
    pub reuse_values: bool,
    pub reset_values: bool,
    /// Explicit `--version` constraint.
    pub version: Option<String>,
    pub devel: bool,
}

impl ValueOptions {
    /// Checks that every local values file exists.
    ///
    /// # Errors
    /// - `AppError::InvalidArgument` naming the first missing file.
    pub fn validate(&self) -> Result<(), AppError> {
        for file in &self.value_files {
            let file = file.trim();
            if file == "-" || file.contains("://") {
                continue;
            }
            if !Path::new(file).exists() {
                return Err(AppError::InvalidArgument(format!(
                    "values file {:?} does not exist",
                    file
                )));
            }
        }
        Ok(())
    }

    /// The version constraint to request; `--devel` only applies when no
    /// explicit version is set.
    pub fn chart_version(&self) -> Option<String> {
        match &self.version {
            Some(version) if !version.is_empty() => Some(version.clone()),
            _ if self.devel => Some(DEVEL_VERSION_CONSTRAINT.to_string()),
            _ => None,
        }
    }

    /// Helm arguments for these options. `--reuse-values` and
    /// `--reset-values` only exist on `helm upgrade`.
    pub fn helm_args(&self, upgrade: bool) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(version) = self.chart_version() {
            args.push("--version".to_string());
            args.push(version);
        }
        for file in &self.value_files {
            args.push("--values".to_string());
            args.push(file.clone());
        }
        for value in &self.values {
            args.push("--set".to_string());
            args.push(value.clone());
        }
        for value in &self.string_values {
            args.push("--set-string".to_string());
            args.push(value.clone());
        }
        if upgrade && self.reuse_values {
            args.push("--reuse-values".to_string());
        }
        if upgrade && self.reset_values {
            args.push("--reset-values".to_string());
        }

        args
    }
}
