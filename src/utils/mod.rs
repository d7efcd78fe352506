// utils/mod.rs

pub mod binary;
pub mod display;
pub mod logging;
pub mod platform;
