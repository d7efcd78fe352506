// error.rs

//! # Error Handling Module
//!
//! This module provides the application-level error type for helm-diff.
//! Failures inside the manifest extractor never reach this type: they are
//! recovered locally as warnings. Everything here is a collaborator-layer
//! failure (helm invocation, argument validation, I/O) or the deliberate
//! "changes detected" signal used by `--detailed-exitcode`.
//!
//! # Usage Example
//! ```rust
//! use crate::error::AppError;
//!
//! fn example_function() -> Result<(), AppError> {
//!     Err(AppError::HelmNotFound)
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::app::EXIT_CODE_CHANGES;

// ============================
// Application Error Definitions
// ============================

/// Represents errors that may occur within the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// The helm binary could not be located.
    #[error("The helm binary was not found (set --helm-bin or HELM_BIN)")]
    HelmNotFound,

    /// A helm invocation exited unsuccessfully.
    ///
    /// Holds the trimmed stderr of the child process.
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// The release does not exist and `--allow-unreleased` was not given.
    #[error("release: {0:?} not found")]
    ReleaseNotFound(String),

    /// A command-line argument failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Helm produced release JSON we could not decode.
    #[error("Failed to decode helm output: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper for standard I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// At least one resource differs and the caller asked for a detailed exit code.
    #[error("identified at least one change, exiting with non-zero exit code (detailed-exitcode parameter enabled)")]
    ChangesDetected,
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ChangesDetected => EXIT_CODE_CHANGES,
            _ => 1,
        }
    }
}

// ============================
// Utility Functions
// ============================

/// Attempts to retrieve the helm binary path, returning an `AppError` if not found.
///
/// # Errors
/// - Returns `AppError::HelmNotFound` if no binary can be located.
pub fn get_helm_path_with_error(explicit: Option<&str>) -> Result<PathBuf, AppError> {
    crate::utils::binary::get_binary_path(explicit).ok_or(AppError::HelmNotFound)
}
