// utils/display.rs

//! # Display Utility Module
//!
//! Terminal helpers that sit around the report: boxed notices, a colored
//! error macro, a spinner for slow helm calls and debug logging of the
//! parsed arguments. Everything here writes to stderr so stdout only ever
//! carries the diff report.
//!
//! ## Example Usage
//! ```rust
//! use crate::utils::display::print_unicode_box;
//!
//! print_unicode_box("Release was not present in Helm.");
//! print_error!("Failed to render the chart.");
//! ```

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use unicode_width::UnicodeWidthStr;

use crate::commands::common_args::DiffArgs;

/// Frames `message` in a Unicode box, padding by display width so emojis
/// and other wide characters stay aligned.
pub fn unicode_box(message: &str) -> String {
    let lines: Vec<&str> = message.split('\n').collect();
    let max_length = lines
        .iter()
        .map(|line| UnicodeWidthStr::width(*line))
        .max()
        .unwrap_or(0);

    let mut framed = format!("┌{}┐\n", "─".repeat(max_length + 2));
    for line in lines {
        let padding = max_length - UnicodeWidthStr::width(line);
        framed.push_str(&format!("│ {}{} │\n", line, " ".repeat(padding)));
    }
    framed.push_str(&format!("└{}┘", "─".repeat(max_length + 2)));
    framed
}

/// Prints a yellow boxed notice to stderr.
pub fn print_unicode_box(message: &str) {
    eprintln!("{}", unicode_box(message).yellow());
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("{}", format!($($arg)*).red())
    }};
}

/// Starts a spinner on stderr; hidden automatically when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let progress_bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        progress_bar.set_style(style);
    }
    progress_bar.set_message(message.to_string());
    progress_bar.enable_steady_tick(Duration::from_millis(100));
    progress_bar
}

/// Log the diff arguments at debug level
pub fn log_diff_args(args: &DiffArgs) {
    debug!("Namespace: {}", args.namespace);
    debug!("Suppressed Kinds: {:?}", args.suppressed_kinds);
    debug!("Context: {}", args.context);
    debug!("Output: {}", args.output);
    debug!("Detailed Exit Code: {}", args.detailed_exitcode);
}
