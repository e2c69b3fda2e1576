//! Error types and Result aliases for Schemerge.
//!
//! This module defines the error hierarchy used throughout the crate.
//! All public functions return `Result<T, Error>` or `Result<T>`.

use thiserror::Error;

/// Result type alias using Schemerge's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Schemerge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A merge pass failed.
    #[error("merge error: {0}")]
    Merge(#[from] MergeError),

    /// File watching error.
    #[error("watcher error: {0}")]
    Watcher(#[from] WatcherError),

    /// External merge process error.
    #[error("subprocess error: {0}")]
    Subprocess(#[from] SubprocessError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Merge-specific errors. Each one aborts the current merge only.
#[derive(Error, Debug)]
pub enum MergeError {
    /// Root directory is missing, not a directory, or cannot be walked.
    #[error("cannot read root directory '{path}': {reason}")]
    RootUnreadable { path: String, reason: String },

    /// A fragment could not be read as UTF-8 text.
    #[error("failed to read fragment '{path}': {reason}")]
    FragmentUnreadable { path: String, reason: String },

    /// The unified output could not be written.
    #[error("failed to write output '{path}': {reason}")]
    OutputUnwritable { path: String, reason: String },
}

/// File watcher errors.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Failed to watch path.
    #[error("failed to watch path '{path}': {reason}")]
    WatchFailed { path: String, reason: String },
}

/// Errors from running the merger as an external process.
#[derive(Error, Debug)]
pub enum SubprocessError {
    /// The process could not be started.
    #[error("failed to start '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    /// The process exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The process ran longer than allowed.
    #[error("'{program}' timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl MergeError {
    /// Create a root-unreadable error.
    pub fn root_unreadable(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        Self::RootUnreadable {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests;
