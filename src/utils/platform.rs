// utils/platform.rs

//! # Platform Utility Module
//!
//! Detects the operating system and derives the platform-specific helm
//! binary name.

use crate::app::HELM_BINARY_NAME;

/// Enum representing supported platforms.
#[derive(Debug, PartialEq)]
pub enum Platform {
    Windows,
    MacOS,
    Linux,
    Unknown,
}

/// Determine the current operating system
pub fn get_platform() -> Platform {
    if cfg!(target_os = "windows") {
        Platform::Windows
    } else if cfg!(target_os = "macos") {
        Platform::MacOS
    } else if cfg!(target_os = "linux") {
        Platform::Linux
    } else {
        Platform::Unknown
    }
}

/// Get the helm binary name for this platform
pub fn get_binary_name() -> String {
    match get_platform() {
        Platform::Windows => format!("{}.exe", HELM_BINARY_NAME),
        _ => HELM_BINARY_NAME.to_string(),
    }
}
