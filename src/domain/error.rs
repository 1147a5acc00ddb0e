//! Error types for the teisearch application.
//!
//! This module defines the centralized error type [`TeiSearchError`] and a type alias
//! [`Result`] for convenient error handling throughout the application. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for teisearch operations.
///
/// This enum consolidates all error conditions that can occur while the
/// application runs, from storage operations to I/O failures and configuration
/// issues. Most variants wrap underlying errors from external crates using
/// `#[from]` for automatic conversion.
///
/// # Examples
///
/// ```
/// use teisearch::TeiSearchError;
///
/// // Explicit error construction
/// fn validate_config() -> Result<(), TeiSearchError> {
///     Err(TeiSearchError::Config("Missing required field".to_string()))
/// }
///
/// fn read_storage() -> Result<(), TeiSearchError> {
///     Err(TeiSearchError::Storage("Failed to read file".to_string()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum TeiSearchError {
    /// Storage operation failed.
    ///
    /// Occurs when reading from or writing to the storage backend fails.
    /// The string contains a description of what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or application failed.
    ///
    /// Occurs when the configured color theme cannot be parsed or applied.
    /// The string contains a description of what went wrong.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the search worker failed.
    ///
    /// Occurs when the UI thread cannot exchange messages with the background
    /// search thread, typically because the channel closed mid-session. The
    /// string contains details about the communication failure.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    ///
    /// Occurs when required configuration values are missing or malformed.
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal initialization or drawing failed.
    ///
    /// Occurs when the terminal cannot be put into raw mode or a frame cannot
    /// be drawn. The string contains a description of what went wrong.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// A specialized `Result` type for teisearch operations.
///
/// This is a type alias for `std::result::Result<T, TeiSearchError>` that simplifies
/// function signatures throughout the codebase.
///
/// # Examples
///
/// ```
/// use teisearch::Result;
///
/// fn refresh_results() -> Result<()> {
///     // Function that may return TeiSearchError
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, TeiSearchError>;
