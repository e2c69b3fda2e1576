//! Structured logging setup.
//!
//! All log output goes to stderr so that stdout carries only the
//! `[OK] <count> files merged` report of the `merge` command.

use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Registry,
};

/// Initialize tracing with the given level and output format.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
///
/// # Panics
///
/// Panics if tracing subscriber has already been initialized in this process.
pub fn init_tracing(level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        Registry::default().with(env_filter).with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);

        Registry::default().with(env_filter).with(fmt_layer).init();
    }

    tracing::debug!("Tracing initialized: level={}, json={}", level, json);
}

/// Span context for merge passes.
pub mod spans {
    use std::path::Path;
    use tracing::{info_span, Span};

    /// Create a span covering one merge pass over `root`.
    #[must_use]
    pub fn merge_span(root: &Path) -> Span {
        info_span!("merge", root = %root.display())
    }
}
