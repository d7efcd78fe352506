// globals.rs

//! # Global Configuration Module
//!
//! Process-wide helm settings resolved once from the global CLI flags: the
//! helm binary to invoke and the kube context to pass along. Only the helm
//! collaborator reads these; the diff core takes its configuration as
//! explicit parameters.
//!
//! ## Example Usage
//! ```rust
//! use crate::globals::{init_globals, helm_binary, kube_context};
//!
//! init_globals(PathBuf::from("/usr/local/bin/helm"), None);
//! assert!(helm_binary().is_some());
//! assert!(kube_context().is_none());
//! ```

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

// ============================
// Global Static Variables
// ============================

/// Path of the helm binary, set once at startup.
static HELM_BINARY: OnceCell<PathBuf> = OnceCell::new();

/// Kube context forwarded to every helm invocation.
static KUBE_CONTEXT: OnceCell<Option<String>> = OnceCell::new();

// ============================
// Initialization Function
// ============================

/// Initializes the global helm settings.
///
/// Only the first call has any effect.
pub fn init_globals(helm_binary: PathBuf, kube_context: Option<String>) {
    HELM_BINARY.set(helm_binary).ok();
    KUBE_CONTEXT.set(kube_context).ok();
}

// ============================
// Getter Functions
// ============================

/// The configured helm binary, if `init_globals` ran.
pub fn helm_binary() -> Option<&'static Path> {
    HELM_BINARY.get().map(PathBuf::as_path)
}

/// The configured kube context, if any.
pub fn kube_context() -> Option<&'static str> {
    KUBE_CONTEXT.get().and_then(|ctx| ctx.as_deref())
}
