//! Fragment merging.
//!
//! This module provides:
//! - Fragment filtering (extension, output file, history directory)
//! - A deterministic recursive scan of the root
//! - Rendering and atomic writing of the unified file

mod filter;
mod merge;
mod scanner;

pub use filter::FragmentFilter;
pub use merge::{merge, render, render_block, MergeReport};
pub use scanner::{scan_fragments, Fragment, ScanStats};
