// helm/mod.rs

//! # Helm Module
//!
//! Everything that talks to helm. The diff core never depends on this
//! module; commands use it to obtain the two renders and then hand plain
//! text to the extractor.

pub mod client;
pub mod release;

pub use client::{HelmCli, ReleaseSource, UpgradeRequest};
pub use release::RenderedRelease;
