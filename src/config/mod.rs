//! Configuration management for kiln
//!
//! This module contains the configuration system components:
//! - `types`: Basic types and enums used throughout the config system
//! - `loader`: Stage options and site configuration file loading

pub mod loader;
pub mod types;


// Re-export commonly used types for convenience
pub use loader::{Options, SiteConfig};
pub use types::{Engine, Patterns};
