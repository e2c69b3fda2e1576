//! Regeneration of the unified file in response to change batches.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use super::events::EventBatch;
use crate::error::SubprocessError;
use crate::merger::{merge, FragmentFilter};
use crate::{Config, Error, Result};

/// Default time allowed for an external merge process.
pub const DEFAULT_SUBPROCESS_TIMEOUT: Duration = Duration::from_secs(30);

/// How a merge is triggered from the watch loop.
#[derive(Debug, Clone)]
pub enum Regenerator {
    /// Call the merger directly on a blocking thread.
    InProcess(Config),
    /// Run the merger as an external command.
    Subprocess {
        program: PathBuf,
        args: Vec<OsString>,
        timeout: Duration,
    },
}

impl Regenerator {
    /// Run the `merge` command of the current executable against `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path of the current executable is unknown.
    pub fn current_exe(config: &Config, timeout: Duration) -> Result<Self> {
        let program = std::env::current_exe()?;
        let args = vec![
            OsString::from("--root"),
            config.root_dir.clone().into_os_string(),
            OsString::from("--output"),
            OsString::from(&config.output_name),
            OsString::from("--extension"),
            OsString::from(&config.extension),
            OsString::from("--history-dir"),
            OsString::from(&config.history_dir),
            OsString::from("merge"),
        ];
        Ok(Self::Subprocess {
            program,
            args,
            timeout,
        })
    }

    /// Regenerate the unified file once.
    ///
    /// Returns the success report line: `[OK] <count> files merged` in
    /// process, or the captured stdout of the external command.
    ///
    /// # Errors
    ///
    /// Returns the merge error in process, or a `SubprocessError` carrying
    /// the captured stderr.
    pub async fn run(&self) -> Result<String> {
        match self {
            Self::InProcess(config) => {
                let config = config.clone();
                let report = tokio::task::spawn_blocking(move || merge(&config))
                    .await
                    .map_err(|e| Error::internal(format!("merge task failed: {e}")))??;
                Ok(report.status_line())
            }
            Self::Subprocess {
                program,
                args,
                timeout,
            } => run_subprocess(program, args, *timeout).await,
        }
    }
}

async fn run_subprocess(program: &Path, args: &[OsString], timeout: Duration) -> Result<String> {
    let name = program.display().to_string();

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| SubprocessError::SpawnFailed {
            program: name.clone(),
            reason: e.to_string(),
        })?;

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| SubprocessError::TimedOut {
            program: name.clone(),
            secs: timeout.as_secs(),
        })?
        .map_err(|e| SubprocessError::SpawnFailed {
            program: name.clone(),
            reason: e.to_string(),
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(SubprocessError::Failed {
            program: name,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into())
    }
}

/// Loop state: waiting for events, or running a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Merging,
}

/// Counters kept by the watch loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WatcherStats {
    pub batches: u64,
    pub events_seen: u64,
    pub events_ignored: u64,
    pub merges_run: u64,
    pub merges_failed: u64,
}

/// Result of handling one batch.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Nothing in the batch was a fragment.
    Ignored,
    /// A merge ran and succeeded, with its report line.
    Merged(String),
    /// A merge ran and failed. The loop keeps going.
    Failed(Error),
}

/// Filters change batches and triggers regeneration, one batch at a time.
pub struct EventHandler {
    filter: FragmentFilter,
    regenerator: Regenerator,
    state: WatchState,
    stats: WatcherStats,
}

impl EventHandler {
    /// Create a handler whose filter is anchored at `config.root_dir`.
    #[must_use]
    pub fn new(config: &Config, regenerator: Regenerator) -> Self {
        Self {
            filter: FragmentFilter::new(config),
            regenerator,
            state: WatchState::Idle,
            stats: WatcherStats::default(),
        }
    }

    /// Current loop state.
    #[must_use]
    pub const fn state(&self) -> WatchState {
        self.state
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> WatcherStats {
        self.stats
    }

    /// Process a batch of changed paths.
    pub async fn process_batch(&mut self, batch: EventBatch) -> BatchOutcome {
        self.stats.batches += 1;
        self.stats.events_seen += batch.len() as u64;

        let (changed, ignored) = batch.qualifying(&self.filter);
        self.stats.events_ignored += ignored as u64;

        if changed.is_empty() {
            tracing::trace!(ignored, "No fragment changes in batch");
            return BatchOutcome::Ignored;
        }

        for path in &changed {
            let shown = self
                .filter
                .relative_display(path)
                .unwrap_or_else(|| path.display().to_string());
            tracing::info!(path = %shown, "Change detected");
        }

        self.regenerate().await
    }

    /// Run one regeneration and report it.
    pub async fn regenerate(&mut self) -> BatchOutcome {
        self.state = WatchState::Merging;
        tracing::info!("Regenerating unified schema");

        let outcome = match self.regenerator.run().await {
            Ok(report) => {
                tracing::info!("{report}");
                BatchOutcome::Merged(report)
            }
            Err(e) => {
                self.stats.merges_failed += 1;
                tracing::error!(error = %e, "Failed to regenerate schema");
                BatchOutcome::Failed(e)
            }
        };

        self.stats.merges_run += 1;
        self.state = WatchState::Idle;
        outcome
    }
}
