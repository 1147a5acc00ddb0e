//! Storage layer for the tracked-entity catalog.
//!
//! This module provides the storage abstraction for persisting programs,
//! attribute definitions, and tracked-entity instances, and for executing
//! search queries against them. It uses JSON file storage with recency-ordered
//! query results.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `query`: Query execution (scoping, filtering, fuzzy matching, pagination)
//! - `seed`: Demonstration data for the `seed` subcommand

pub mod backend;
pub mod json;
pub mod query;
pub mod seed;

pub use backend::Storage;
pub use json::JsonStorage;
pub use seed::{seed_demo_data, SeedSummary};
