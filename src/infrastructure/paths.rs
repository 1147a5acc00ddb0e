//! Path manipulation utilities.
//!
//! This module provides functions for locating the application's data
//! directory and for expanding tilde-prefixed paths from configuration into
//! absolute filesystem paths.

use std::path::PathBuf;

/// Returns the data directory for teisearch storage.
///
/// The directory is located at `~/.local/share/teisearch`, resolved through
/// the `HOME` environment variable. Both the JSON store (`entities.json`) and
/// the trace log live within this directory. Falls back to the current
/// directory when `HOME` is unset.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".local/share").join("teisearch")
}

/// Returns the default configuration file location.
///
/// The file is looked up at `~/.config/teisearch/config.toml`, resolved
/// through the `HOME` environment variable. The file is optional; callers
/// treat its absence as an empty configuration.
#[must_use]
pub fn get_config_file() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config/teisearch/config.toml")
}

/// Expands tilde paths against the user's home directory.
///
/// Configuration values may use `~` for the home directory. This function
/// converts such paths to absolute ones; paths without a tilde prefix pass
/// through unchanged.
///
/// # Examples
///
/// ```
/// use teisearch::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    expand_tilde_with(path, &home)
}

fn expand_tilde_with(path: &str, home: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', home, 1)
    } else if path == "~" {
        home.to_string()
    } else {
        path.to_string()
    }
}
