//! Schemerge
//!
//! Merges GraphQL schema fragments into a single unified file and keeps that
//! file regenerated while the fragments change.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod merger;
pub mod observability;
pub mod watcher;

pub use config::Config;
pub use error::{Error, MergeError, Result, SubprocessError, WatcherError};
pub use merger::{merge, MergeReport};
pub use watcher::{watch, Regenerator, WatchSummary};
