// core/env.rs

//! # Environment Variable Handling
//!
//! Collects extra environment variables for the helm child processes from an
//! optional `.env` file and `-e KEY=VALUE` overrides. Typical entries are
//! `KUBECONFIG`, `HELM_KUBETOKEN` or registry credentials.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};

use crate::error::AppError;

/// Loads variables from `env_file` (when it exists) and applies `overrides`.
///
/// Overrides win over file entries. A missing file is not an error; an
/// unreadable one is logged and ignored.
///
/// # Errors
/// - `AppError::InvalidArgument` if an override is not of the form `KEY=VALUE`.
pub fn load_env_vars(
    env_file: &str,
    overrides: &[String],
) -> Result<BTreeMap<String, String>, AppError> {
    let mut env_vars = BTreeMap::new();

    let dotenv_path = Path::new(env_file);
    if dotenv_path.is_file() {
        debug!("Loading environment variables from: {}", env_file);
        match dotenvy::from_path_iter(dotenv_path) {
            Ok(iter) => {
                for item in iter {
                    match item {
                        Ok((key, value)) => {
                            debug!("  Loaded env var: {}", key);
                            env_vars.insert(key, value);
                        }
                        Err(e) => warn!("Ignoring invalid line in {}: {}", env_file, e),
                    }
                }
            }
            Err(e) => warn!("Could not load env file {}: {}", env_file, e),
        }
    } else {
        debug!("No env file found at: {}", env_file);
    }

    for override_str in overrides {
        let (key, value) = parse_env_var(override_str).ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "environment override {:?} must be KEY=VALUE",
                override_str
            ))
        })?;
        debug!("  Override env var: {}", key);
        env_vars.insert(key, value);
    }

    Ok(env_vars)
}

/// Parses a single `KEY=VALUE` pair; the key must be non-empty.
fn parse_env_var(s: &str) -> Option<(String, String)> {
    let (key, value) = s.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}
