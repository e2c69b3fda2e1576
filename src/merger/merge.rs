//! The merge pass: read fragments, render the unified file, write it.

use std::fs;
use std::path::{Path, PathBuf};

use super::filter::FragmentFilter;
use super::scanner::{scan_fragments, Fragment};
use crate::error::MergeError;
use crate::observability::spans;
use crate::{Config, Error, Result};

/// Separator placed between consecutive blocks: exactly one blank line.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Outcome of a successful merge pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of fragments written into the output.
    pub fragment_count: usize,
    /// Size of the output in bytes.
    pub bytes_written: usize,
    /// Path of the unified output.
    pub output_path: PathBuf,
}

impl MergeReport {
    /// One-line status in the form printed by the `merge` command.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("[OK] {} files merged", self.fragment_count)
    }
}

/// Render one fragment block: a header line followed by trimmed contents.
#[must_use]
pub fn render_block(relative_path: &str, contents: &str) -> String {
    format!("# --- {relative_path} ---\n{}", contents.trim())
}

/// Render the unified document from `(relative_path, contents)` pairs, in the given order.
#[must_use]
pub fn render<'a, I>(blocks: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    blocks
        .into_iter()
        .map(|(path, contents)| render_block(path, contents))
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Run one merge pass over `config.root_dir`.
///
/// The output is fully replaced: the rendered text is written to a
/// temporary sibling and renamed over the output.
///
/// # Errors
///
/// Returns a `MergeError` if the root cannot be walked, a fragment cannot
/// be read as UTF-8, or the output cannot be written. Nothing is written
/// unless every fragment was read.
pub fn merge(config: &Config) -> Result<MergeReport> {
    let span = spans::merge_span(&config.root_dir);
    let _guard = span.enter();

    let filter = FragmentFilter::new(config);
    let (fragments, _stats) = scan_fragments(&filter)?;

    let contents = read_all(&fragments)?;
    let unified = render(
        fragments
            .iter()
            .zip(&contents)
            .map(|(f, c)| (f.relative_path.as_str(), c.as_str())),
    );

    let output_path = config.output_path();
    write_atomic(&output_path, &config.temp_output_path(), &unified)?;

    tracing::debug!(
        fragments = fragments.len(),
        bytes = unified.len(),
        output = %output_path.display(),
        "Unified schema written"
    );

    Ok(MergeReport {
        fragment_count: fragments.len(),
        bytes_written: unified.len(),
        output_path,
    })
}

fn read_all(fragments: &[Fragment]) -> Result<Vec<String>> {
    fragments
        .iter()
        .map(|f| {
            fs::read_to_string(&f.path).map_err(|e| {
                Error::from(MergeError::FragmentUnreadable {
                    path: f.relative_path.clone(),
                    reason: e.to_string(),
                })
            })
        })
        .collect()
}

fn write_atomic(path: &Path, temp_path: &Path, contents: &str) -> Result<()> {
    let unwritable = |e: std::io::Error| MergeError::OutputUnwritable {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let discard = |e: std::io::Error| {
        let _ = fs::remove_file(temp_path);
        unwritable(e)
    };

    fs::write(temp_path, contents.as_bytes()).map_err(discard)?;
    fs::rename(temp_path, path).map_err(discard)?;

    Ok(())
}
