//! File system event batches.

#![allow(clippy::missing_const_for_fn)]

use std::path::PathBuf;

use crate::merger::FragmentFilter;

/// Changed paths delivered together after one debounce window.
///
/// Creation, modification, deletion and rename are not told apart: any
/// change to a fragment means the unified file must be regenerated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventBatch {
    /// Changed paths, deduplicated, in arrival order.
    pub paths: Vec<PathBuf>,
}

impl EventBatch {
    /// Create a new empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a changed path to the batch.
    pub fn add(&mut self, path: PathBuf) {
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Split the batch into qualifying paths and the number of ignored ones.
    ///
    /// A path qualifies if it is a fragment, or a directory under the root
    /// that was created, renamed, moved or deleted as a whole.
    #[must_use]
    pub fn qualifying(self, filter: &FragmentFilter) -> (Vec<PathBuf>, usize) {
        let total = self.paths.len();
        let kept: Vec<PathBuf> = self
            .paths
            .into_iter()
            .filter(|p| filter.qualifies(p) || filter.may_hold_fragments(p))
            .collect();
        let ignored = total - kept.len();
        (kept, ignored)
    }

    /// Check if batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Get total number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

impl FromIterator<PathBuf> for EventBatch {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut batch = Self::new();
        for path in iter {
            batch.add(path);
        }
        batch
    }
}
