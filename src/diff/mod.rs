// diff/mod.rs

//! # Manifest Diff Module
//!
//! Compares two [`ManifestMapping`](crate::manifest::ManifestMapping)s and
//! renders the result.
//!
//! ## Entry point
//!
//! ```ignore
//! use crate::diff::{diff_manifests, DiffOptions};
//!
//! let options = DiffOptions::new().suppress("Secret").with_context(3);
//! let (report, changed) = diff_manifests(&before, &after, &options);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: records are produced in identity order (kind,
//!   namespace, name), so the same inputs always render the same report.
//! - **Suppression keeps the signal**: a suppressed kind is still classified
//!   and counted, only its content is withheld.
//! - **Totality**: comparison cannot fail.

pub mod engine;
pub mod lcs;
pub mod model;
pub mod render;

pub use engine::diff_manifests;
pub use model::{DiffOptions, OutputFormat};
