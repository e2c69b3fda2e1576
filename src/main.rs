//! Schemerge - GraphQL schema fragment merger
//!
//! Entry point for the `merge` and `watch` commands.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use schemerge::config::{
    DEFAULT_EXTENSION, DEFAULT_HISTORY_DIR, DEFAULT_OUTPUT_NAME, DEFAULT_ROOT_DIR,
};
use schemerge::observability::init_tracing;
use schemerge::watcher::WatcherConfig;
use schemerge::{merge, watch, Config, Regenerator, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Schemerge - merge GraphQL schema fragments into one file
#[derive(Parser, Debug)]
#[command(name = "schemerge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the schema fragments
    #[arg(short, long, env = "SCHEMERGE_ROOT", default_value = DEFAULT_ROOT_DIR)]
    root: std::path::PathBuf,

    /// File name of the unified output, created directly under the root
    #[arg(short, long, env = "SCHEMERGE_OUTPUT", default_value = DEFAULT_OUTPUT_NAME)]
    output: String,

    /// Fragment file extension, without the dot
    #[arg(long, env = "SCHEMERGE_EXTENSION", default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Directory name whose contents are never merged
    #[arg(long, env = "SCHEMERGE_HISTORY_DIR", default_value = DEFAULT_HISTORY_DIR)]
    history_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SCHEMERGE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "SCHEMERGE_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Regenerate the unified file once
    Merge,

    /// Regenerate the unified file whenever a fragment changes
    Watch {
        /// Milliseconds over which bursts of changes are coalesced
        #[arg(long, env = "SCHEMERGE_DEBOUNCE_MS", default_value = "300")]
        debounce_ms: u64,

        /// Merge once before waiting for changes
        #[arg(long)]
        merge_on_start: bool,

        /// Run each merge as a separate `schemerge merge` process
        #[arg(long)]
        subprocess: bool,

        /// Seconds a merge subprocess may run before it is killed
        #[arg(long, default_value = "30")]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config {
        root_dir: cli.root,
        output_name: cli.output,
        extension: cli.extension,
        history_dir: cli.history_dir,
        log_level: cli.log_level,
    };

    tracing::debug!(?config, "Configuration loaded");
    config.validate()?;

    match cli.command {
        Command::Merge => {
            let report = merge(&config)?;
            println!("{}", report.status_line());
        }
        Command::Watch {
            debounce_ms,
            merge_on_start,
            subprocess,
            timeout_secs,
        } => {
            let watcher_config = WatcherConfig {
                debounce: Duration::from_millis(debounce_ms),
                merge_on_start,
                subprocess_timeout: Duration::from_secs(timeout_secs),
            };
            watcher_config.validate()?;

            let regenerator = if subprocess {
                Regenerator::current_exe(&config, watcher_config.subprocess_timeout)?
            } else {
                Regenerator::InProcess(config.clone())
            };

            let shutdown = CancellationToken::new();
            let trigger = shutdown.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                trigger.cancel();
            });

            watch(&config, &watcher_config, regenerator, shutdown).await?;
        }
    }

    Ok(())
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
