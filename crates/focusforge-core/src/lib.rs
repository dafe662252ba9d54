//! FocusForge Core - Shared functionality for the FocusForge terminal timer
//!
//! Per-user paths, the reserved settings file, and display formatting.

pub mod config;
pub mod format;
pub mod paths;

pub use config::Settings;
pub use paths::{Paths, StartupError};
