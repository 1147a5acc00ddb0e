//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber with a file-backed fmt
//! layer, setting up the complete pipeline from `tracing` macros to the log
//! file under the data directory.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::file_writer::FileWriter;
use crate::Config;

/// Initializes the tracing subscriber with file-based output.
///
/// Sets up a tracing subscriber pipeline that:
/// 1. Filters events based on the configured trace level
/// 2. Formats them through the `tracing-subscriber` fmt layer (no ANSI)
/// 3. Writes to a rotating file with backups
///
/// # Parameters
///
/// * `config` - Application configuration containing the `trace_level`
///   option and the data path
///
/// # Trace Level Resolution
///
/// The filter directive is determined by:
/// 1. `RUST_LOG` if set
/// 2. `config.trace_level` if set
/// 3. Neither: tracing stays disabled and this function returns
///
/// # File Location
///
/// Events are written to `teisearch.log` in the directory holding the JSON
/// store, `~/.local/share/teisearch` by default. Stdout is never used; the
/// terminal belongs to the TUI.
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently skips setup if directory creation fails
/// - Idempotent: safe to call multiple times (only the first call takes
///   effect)
///
/// # Example
///
/// ```rust,no_run
/// use teisearch::observability::init_tracing;
/// use teisearch::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(env) => EnvFilter::new(env),
        Err(_) => match &config.trace_level {
            Some(level) => EnvFilter::new(level),
            None => return,
        },
    };

    let log_dir = config.data_path.parent().map_or_else(
        crate::infrastructure::paths::get_data_dir,
        std::path::Path::to_path_buf,
    );
    if std::fs::create_dir_all(&log_dir).is_err() {
        // Silently fail if we can't create the directory
        return;
    }

    let writer = Arc::new(FileWriter::new(log_dir.join("teisearch.log")));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
}
