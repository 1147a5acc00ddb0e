//! Domain layer for the teisearch application.
//!
//! This module contains the core domain types shared by every other layer,
//! independent of terminal, storage, or worker concerns. It follows
//! domain-driven design principles by keeping the model isolated from external
//! dependencies.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`entity`]: Tracked-entity models (attributes, programs, instances, result envelopes)
//! - [`query`]: Search query composition
//!
//! # Examples
//!
//! ```
//! use teisearch::domain::{Result, TrackedEntityAttribute, ValueType};
//!
//! fn date_of_birth() -> Result<TrackedEntityAttribute> {
//!     Ok(TrackedEntityAttribute::new("dob", "Date of birth", ValueType::Date))
//! }
//! ```

pub mod entity;
pub mod error;
pub mod query;

pub use entity::{
    AttributeField, Pager, Program, SearchResults, TrackedEntityAttribute, TrackedEntityInstance,
    ValueType,
};
pub use error::{Result, TeiSearchError};
pub use query::{AttributeFilter, SearchQuery};
