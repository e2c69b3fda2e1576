//! Fragment filtering shared by the merger and the watcher.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::Config;

/// Decides which paths under the root are schema fragments.
///
/// A path qualifies when it has the fragment extension, is not the
/// unified output itself, and has no history-directory component below
/// the root. Ancestors of the root are never inspected.
#[derive(Debug, Clone)]
pub struct FragmentFilter {
    root: PathBuf,
    output_path: PathBuf,
    extension: String,
    history_dir: String,
}

impl FragmentFilter {
    /// Build a filter from the configuration, anchored at `config.root_dir`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.root_dir.clone(),
            output_path: config.output_path(),
            extension: config.extension.clone(),
            history_dir: config.history_dir.clone(),
        }
    }

    /// Root directory the filter is anchored at.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check whether `path` is a fragment that belongs in the merge.
    ///
    /// Does not touch the filesystem, so deleted paths can still qualify.
    #[must_use]
    pub fn qualifies(&self, path: &Path) -> bool {
        if !self.has_fragment_extension(path) {
            return false;
        }

        if path == self.output_path {
            return false;
        }

        match path.strip_prefix(&self.root) {
            Ok(relative) => !self.is_in_history(relative),
            Err(_) => false,
        }
    }

    /// Check whether a change to `path` can add or remove fragments as a whole
    /// directory: a renamed, moved or deleted directory under the root.
    ///
    /// Such paths carry no extension and are either a directory now or gone.
    /// The root itself and anything under the history directory never count.
    #[must_use]
    pub fn may_hold_fragments(&self, path: &Path) -> bool {
        if path.extension().is_some() {
            return false;
        }

        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        if relative.as_os_str().is_empty() || self.is_in_history(relative) {
            return false;
        }

        path.is_dir() || !path.exists()
    }

    /// Check if a path carries the fragment extension (case-sensitive).
    #[must_use]
    pub fn has_fragment_extension(&self, path: &Path) -> bool {
        path.extension() == Some(OsStr::new(&self.extension))
    }

    fn is_in_history(&self, relative: &Path) -> bool {
        relative
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == OsStr::new(&self.history_dir)))
    }

    /// Path of `path` relative to the root, joined with `/` on every platform.
    ///
    /// Returns `None` if `path` is not under the root.
    #[must_use]
    pub fn relative_display(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> FragmentFilter {
        FragmentFilter::new(&Config::with_root("/srv/graphql"))
    }

    #[test]
    fn test_extension() {
        let f = filter();
        assert!(f.qualifies(Path::new("/srv/graphql/user.graphqls")));
        assert!(f.qualifies(Path::new("/srv/graphql/types/deep/card.graphqls")));
        assert!(!f.qualifies(Path::new("/srv/graphql/user.graphql")));
        assert!(!f.qualifies(Path::new("/srv/graphql/user.GRAPHQLS")));
        assert!(!f.qualifies(Path::new("/srv/graphql/notes.md")));
        assert!(!f.qualifies(Path::new("/srv/graphql/graphqls")));
    }

    #[test]
    fn test_output_excluded_by_exact_path() {
        let f = filter();
        assert!(!f.qualifies(Path::new("/srv/graphql/unified.graphqls")));
        assert!(!f.qualifies(Path::new("/srv/graphql/unified.graphqls.tmp")));
        // Same name in a subdirectory is an ordinary fragment.
        assert!(f.qualifies(Path::new("/srv/graphql/legacy/unified.graphqls")));
    }

    #[test]
    fn test_history_excluded() {
        let f = filter();
        assert!(!f.qualifies(Path::new("/srv/graphql/.history/old.graphqls")));
        assert!(!f.qualifies(Path::new(
            "/srv/graphql/types/.history/user_20240101.graphqls"
        )));
        assert!(f.qualifies(Path::new("/srv/graphql/history/user.graphqls")));
        assert!(f.qualifies(Path::new("/srv/graphql/.historyx/user.graphqls")));
    }

    #[test]
    fn test_history_ancestor_of_root_is_ignored() {
        let f = FragmentFilter::new(&Config::with_root("/home/dev/.history/app/graphql"));
        assert!(f.qualifies(Path::new("/home/dev/.history/app/graphql/user.graphqls")));
    }

    #[test]
    fn test_outside_root_rejected() {
        let f = filter();
        assert!(!f.qualifies(Path::new("/srv/other/user.graphqls")));
    }

    #[test]
    fn test_custom_extension() {
        let config = Config {
            extension: "gql".to_string(),
            output_name: "schema.gql".to_string(),
            ..Config::with_root("/s")
        };
        let f = FragmentFilter::new(&config);
        assert!(f.qualifies(Path::new("/s/a.gql")));
        assert!(!f.qualifies(Path::new("/s/schema.gql")));
        assert!(!f.qualifies(Path::new("/s/a.graphqls")));
    }

    #[test]
    fn test_directory_changes_may_hold_fragments() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("models")).unwrap();
        std::fs::create_dir_all(root.join(".history/types")).unwrap();
        std::fs::write(root.join("LICENSE"), "MIT").unwrap();
        let f = FragmentFilter::new(&Config::with_root(root));

        assert!(f.may_hold_fragments(&root.join("models")));
        // Renamed away or deleted.
        assert!(f.may_hold_fragments(&root.join("types")));
        assert!(!f.may_hold_fragments(root));
        assert!(!f.may_hold_fragments(&root.join(".history/types")));
        assert!(!f.may_hold_fragments(&root.join("LICENSE")));
        assert!(!f.may_hold_fragments(&root.join("notes.md")));
        assert!(!f.may_hold_fragments(Path::new("/elsewhere/types")));
    }

    #[test]
    fn test_relative_display() {
        let f = filter();
        assert_eq!(
            f.relative_display(Path::new("/srv/graphql/types/user.graphqls")),
            Some("types/user.graphqls".to_string())
        );
        assert_eq!(f.relative_display(Path::new("/elsewhere/x.graphqls")), None);
    }
}
