//! Directory scanner that collects fragments for a merge pass.
//!
//! Walks the root recursively and returns the qualifying fragments in a
//! stable order: byte-wise lexicographic on the `/`-joined relative path.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::filter::FragmentFilter;
use crate::error::MergeError;
use crate::Result;

/// One schema fragment found under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Path relative to the root, `/`-separated. Used as the block header.
    pub relative_path: String,
    /// Path on disk.
    pub path: PathBuf,
}

/// Scan statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub files_found: u64,
    pub fragments: u64,
    pub files_skipped: u64,
}

/// Collect every qualifying fragment under the filter's root.
///
/// # Errors
///
/// Returns `MergeError::RootUnreadable` if the root is missing, is not a
/// directory, or any part of the tree cannot be walked.
pub fn scan_fragments(filter: &FragmentFilter) -> Result<(Vec<Fragment>, ScanStats)> {
    let root = filter.root();
    ensure_dir(root)?;

    let mut stats = ScanStats::default();
    let mut fragments = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            MergeError::root_unreadable(path, e)
        })?;

        if !is_regular_file(&entry) {
            continue;
        }

        stats.files_found += 1;

        let path = entry.path();
        if !filter.qualifies(path) {
            stats.files_skipped += 1;
            continue;
        }

        let Some(relative_path) = filter.relative_display(path) else {
            stats.files_skipped += 1;
            continue;
        };

        fragments.push(Fragment {
            relative_path,
            path: path.to_path_buf(),
        });
        stats.fragments += 1;
    }

    fragments.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    tracing::debug!(
        root = %root.display(),
        found = stats.files_found,
        fragments = stats.fragments,
        skipped = stats.files_skipped,
        "Fragment scan complete"
    );

    Ok((fragments, stats))
}

/// Regular files, or symlinks whose target is a regular file.
///
/// Symlinked directories are not descended into.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    file_type.is_symlink()
        && std::fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file())
}

fn ensure_dir(root: &Path) -> Result<()> {
    let meta = std::fs::metadata(root).map_err(|e| MergeError::root_unreadable(root, e))?;
    if !meta.is_dir() {
        return Err(MergeError::root_unreadable(root, "not a directory").into());
    }
    Ok(())
}
