//! Infrastructure layer for filesystem and environment interactions.
//!
//! This module provides utilities for locating application data on disk and
//! resolving user-supplied paths from configuration.

pub mod paths;

pub use paths::{expand_tilde, get_config_file, get_data_dir};
