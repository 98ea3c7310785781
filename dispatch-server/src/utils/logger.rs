//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use tracing_subscriber::EnvFilter;

/// Initialize the logger
///
/// Respects `RUST_LOG` when set; falls back to the given level.
pub fn init_logger(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}
