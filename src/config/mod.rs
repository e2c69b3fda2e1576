//! Configuration management for Schemerge.
//!
//! Supports configuration from:
//! - Command-line arguments (highest priority)
//! - Environment variables
//! - Built-in defaults (lowest priority)

mod settings;

pub use settings::{
    Config, DEFAULT_EXTENSION, DEFAULT_HISTORY_DIR, DEFAULT_OUTPUT_NAME, DEFAULT_ROOT_DIR,
};
