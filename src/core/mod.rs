// core/mod.rs

//! # Core Module
//!
//! Inputs handed to helm on the diff's behalf: environment variables for the
//! child process and the chart/values options of an upgrade.

pub mod env;
pub mod values;
