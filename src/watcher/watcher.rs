//! File system watcher using notify-rs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, Debouncer};
use tokio::sync::mpsc;

use super::events::EventBatch;
use super::handler::DEFAULT_SUBPROCESS_TIMEOUT;
use crate::error::WatcherError;
use crate::Result;

/// Default debounce window for file events.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Upper bound accepted for the debounce window.
const MAX_DEBOUNCE: Duration = Duration::from_secs(60);

/// Watch loop configuration.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Window over which raw events are coalesced into one batch.
    pub debounce: Duration,
    /// Run one merge before waiting for the first change.
    pub merge_on_start: bool,
    /// Time a merge subprocess may run before it is killed.
    pub subprocess_timeout: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            merge_on_start: false,
            subprocess_timeout: DEFAULT_SUBPROCESS_TIMEOUT,
        }
    }
}

impl WatcherConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if the debounce window is zero or too long, or the
    /// subprocess timeout is shorter than one second.
    pub fn validate(&self) -> Result<()> {
        if self.debounce.is_zero() {
            return Err(crate::Error::config("debounce cannot be 0"));
        }
        if self.debounce > MAX_DEBOUNCE {
            return Err(crate::Error::config(format!(
                "debounce cannot exceed {}s",
                MAX_DEBOUNCE.as_secs()
            )));
        }
        if self.subprocess_timeout < Duration::from_secs(1) {
            return Err(crate::Error::config(
                "subprocess timeout must be at least 1s",
            ));
        }
        Ok(())
    }
}

/// Recursive, debounced subscription to one directory tree.
///
/// Dropping the watcher cancels the subscription.
pub struct FileWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    event_rx: mpsc::Receiver<EventBatch>,
    root: PathBuf,
}

impl FileWatcher {
    /// Subscribe to changes under `root`.
    ///
    /// # Errors
    ///
    /// Returns `WatcherError::WatchFailed` if the directory does not exist
    /// or the platform watcher cannot be created.
    pub fn new(root: impl AsRef<Path>, debounce: Duration) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.is_dir() {
            return Err(WatcherError::WatchFailed {
                path: root.display().to_string(),
                reason: "directory does not exist".to_string(),
            }
            .into());
        }

        let (batch_tx, event_rx) = mpsc::channel(100);

        let mut debouncer = new_debouncer(
            debounce,
            move |result: std::result::Result<
                Vec<notify_debouncer_mini::DebouncedEvent>,
                notify::Error,
            >| {
                match result {
                    Ok(events) => {
                        let batch: EventBatch = events.into_iter().map(|e| e.path).collect();
                        if !batch.is_empty() {
                            let _ = batch_tx.blocking_send(batch);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Watch error: {:?}", e);
                    }
                }
            },
        )
        .map_err(|e| WatcherError::WatchFailed {
            path: root.display().to_string(),
            reason: e.to_string(),
        })?;

        debouncer
            .watcher()
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| WatcherError::WatchFailed {
                path: root.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(path = %root.display(), "Subscribed to directory");

        Ok(Self {
            _debouncer: debouncer,
            event_rx,
            root,
        })
    }

    /// Receive the next batch of changed paths.
    ///
    /// Returns `None` if the notification thread has gone away.
    pub async fn recv(&mut self) -> Option<EventBatch> {
        self.event_rx.recv().await
    }

    /// Directory being watched.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
