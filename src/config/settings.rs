//! Configuration settings and validation.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Default directory holding the schema fragments.
pub const DEFAULT_ROOT_DIR: &str = "./graphql";

/// Default name of the generated file, directly under the root.
pub const DEFAULT_OUTPUT_NAME: &str = "unified.graphqls";

/// Default fragment extension (without the dot).
pub const DEFAULT_EXTENSION: &str = "graphqls";

/// Default name of the editor history directory that is never merged.
pub const DEFAULT_HISTORY_DIR: &str = ".history";

/// Shared configuration for the merger and the watcher.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for fragments and watched for changes.
    pub root_dir: PathBuf,

    /// File name of the unified output, created directly under `root_dir`.
    pub output_name: String,

    /// Fragment file extension, without a leading dot.
    pub extension: String,

    /// Directory name whose contents are always excluded.
    pub history_dir: String,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            history_dir: DEFAULT_HISTORY_DIR.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a default configuration rooted at `root_dir`.
    #[must_use]
    pub fn with_root(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(Error::config("root directory cannot be empty"));
        }

        if !is_single_segment(&self.output_name) {
            return Err(Error::config(format!(
                "output name '{}' must be a plain file name",
                self.output_name
            )));
        }

        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(Error::config(format!(
                "extension '{}' must be non-empty and given without a leading dot",
                self.extension
            )));
        }

        if !is_single_segment(&self.history_dir) {
            return Err(Error::config(format!(
                "history directory '{}' must be a single path segment",
                self.history_dir
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Get the path of the unified output file.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.root_dir.join(&self.output_name)
    }

    /// Get the scratch path the output is written to before being renamed into place.
    #[must_use]
    pub fn temp_output_path(&self) -> PathBuf {
        self.root_dir.join(format!("{}.tmp", self.output_name))
    }

    /// Resolve the root directory to an absolute, symlink-free path.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory does not exist.
    pub fn canonical_root(&self) -> Result<PathBuf> {
        Ok(self.root_dir.canonicalize()?)
    }

    /// Return a copy of this configuration with `root_dir` replaced.
    #[must_use]
    pub fn rebased(&self, root_dir: &Path) -> Self {
        Self {
            root_dir: root_dir.to_path_buf(),
            ..self.clone()
        }
    }
}

fn is_single_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}
