//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (site paths, timeouts, retry bounds, defaults)
//! - CLI option types and parsing
//! - Browser timing knobs

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, Timing};
