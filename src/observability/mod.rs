//! File-based tracing for the terminal application.
//!
//! This module wires the `tracing` macros used across the crate to a log
//! file under the data directory. Nothing is ever written to stdout or
//! stderr while the application runs, because the terminal is owned by the
//! TUI; inspecting the log file is the supported way to debug a session.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → teisearch.log
//! ```
//!
//! # Features
//!
//! - **File-Based Output**: Events written to `<data dir>/teisearch.log`
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//! - **Plain Text Format**: `tracing-subscriber` fmt layer without ANSI codes
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Unset: tracing stays disabled
//!
//! # Usage
//!
//! Initialize tracing early, before the terminal enters raw mode:
//!
//! ```rust,no_run
//! use teisearch::observability::init_tracing;
//! use teisearch::Config;
//!
//! let config = Config::default();
//! init_tracing(&config);
//!
//! tracing::debug!("application initialized");
//! ```
//!
//! # Modules
//!
//! - [`init`]: Tracing initialization and subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use init::init_tracing;
