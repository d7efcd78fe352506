// utils/binary.rs

//! # Binary Utility Module
//!
//! Locates the helm binary. Helm exports `HELM_BIN` to the plugins it runs,
//! so that takes precedence over a `PATH` lookup; an explicit `--helm-bin`
//! beats both.
//!
//! ## Example Usage
//! ```rust
//! use crate::utils::binary::get_binary_path;
//!
//! if let Some(path) = get_binary_path(None) {
//!     println!("Found helm binary at: {:?}", path);
//! }
//! ```

use std::env;
use std::path::{Path, PathBuf};

use log::debug;

use crate::app::HELM_BIN_ENV;

/// Get the full path to the helm binary
pub fn get_binary_path(explicit: Option<&str>) -> Option<PathBuf> {
    let candidate = explicit
        .map(str::to_string)
        .or_else(|| env::var(HELM_BIN_ENV).ok())
        .filter(|candidate| !candidate.trim().is_empty());

    let found = match candidate {
        Some(candidate) => resolve_candidate(&candidate),
        None => find_in_path(&super::platform::get_binary_name()),
    };

    debug!("Resolved helm binary: {:?}", found);
    found
}

/// A path is used as-is; a bare name is looked up on `PATH`.
fn resolve_candidate(candidate: &str) -> Option<PathBuf> {
    let path = Path::new(candidate);
    if path.is_absolute() || path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    find_in_path(candidate)
}

/// Search each `PATH` entry for `binary_name`.
pub fn find_in_path(binary_name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(binary_name))
        .find(|full_path| full_path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_explicit_path_is_used_when_it_exists() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        assert_eq!(get_binary_path(Some(path)), Some(file.path().to_path_buf()));
    }

    #[test]
    fn test_missing_explicit_path_is_not_found() {
        assert_eq!(get_binary_path(Some("/nonexistent/dir/helm")), None);
    }
}
