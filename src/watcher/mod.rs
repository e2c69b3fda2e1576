//! File system watching and regeneration.
//!
//! This module provides:
//! - A debounced recursive subscription using notify-rs
//! - Filtering of change batches down to schema fragments
//! - Serial regeneration of the unified file, in process or as a subprocess

mod events;
mod handler;
#[allow(clippy::module_inception)]
mod watcher;

pub use events::EventBatch;
pub use handler::{
    BatchOutcome, EventHandler, Regenerator, WatchState, WatcherStats, DEFAULT_SUBPROCESS_TIMEOUT,
};
pub use watcher::{FileWatcher, WatcherConfig, DEFAULT_DEBOUNCE};

use tokio_util::sync::CancellationToken;

use crate::{Config, Result};

/// Counters reported when the watch loop stops.
pub type WatchSummary = WatcherStats;

/// Watch `config.root_dir` and regenerate on every batch of fragment changes.
///
/// Batches are handled strictly one after another. A failed merge is
/// reported and the loop keeps waiting for the next change. The loop ends
/// when `shutdown` is cancelled; the subscription is dropped on return.
///
/// # Errors
///
/// Returns an error only if the subscription cannot be established.
pub async fn watch(
    config: &Config,
    watcher_config: &WatcherConfig,
    regenerator: Regenerator,
    shutdown: CancellationToken,
) -> Result<WatchSummary> {
    watcher_config.validate()?;

    // Notification paths are absolute and symlink-free.
    let root = config.canonical_root().map_err(|e| crate::WatcherError::WatchFailed {
        path: config.root_dir.display().to_string(),
        reason: e.to_string(),
    })?;
    let config = config.rebased(&root);

    let mut watcher = FileWatcher::new(&root, watcher_config.debounce)?;
    let mut handler = EventHandler::new(&config, regenerator);

    tracing::info!(path = %watcher.root().display(), "Watching for changes");

    if watcher_config.merge_on_start {
        handler.regenerate().await;
    }

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            batch = watcher.recv() => {
                let Some(batch) = batch else {
                    tracing::warn!("Event channel closed, stopping watch");
                    break;
                };
                handler.process_batch(batch).await;
            }
        }
    }

    let stats = handler.stats();
    tracing::info!(
        merges = stats.merges_run,
        failed = stats.merges_failed,
        ignored = stats.events_ignored,
        "Watch stopped"
    );

    Ok(stats)
}
