//! framebridge-configs
//!
//! Configuration types and loader for FrameBridge.

pub mod config;

pub use config::*;
pub use config::defaults;
