//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait that abstracts over different persistence
//! backends. This allows seamless switching between storage implementations without
//! changing presenter or worker logic.
//!
//! # Design Philosophy
//!
//! The trait is designed to be minimal and focused on the actual operations needed
//! by the application, not a generic ORM. Each method maps directly to a use case
//! in the presenter or the search worker.

use crate::domain::entity::{Program, SearchResults, TrackedEntityAttribute, TrackedEntityInstance};
use crate::domain::error::Result;
use crate::domain::query::SearchQuery;

/// Abstraction over persistent storage backends.
///
/// Implementations hold the full catalog of programs, attribute definitions,
/// and tracked-entity instances, and execute search queries into paged result
/// envelopes.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes (default)
///
/// # Examples
///
/// ```no_run
/// use teisearch::storage::{JsonStorage, Storage};
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::new(PathBuf::from("/tmp/entities.json"))?;
/// let programs = storage.programs()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Retrieves all programs in selector order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn programs(&self) -> Result<Vec<Program>>;

    /// Retrieves all attribute definitions in form order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn attributes(&self) -> Result<Vec<TrackedEntityAttribute>>;

    /// Retrieves the attribute definitions searchable within one program,
    /// ordered as the program lists them.
    ///
    /// Attribute ids the program names but the catalog does not hold are
    /// silently skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the program does not exist or the read fails.
    fn attributes_for_program(&self, program_id: &str) -> Result<Vec<TrackedEntityAttribute>>;

    /// Executes a search query into a paged result envelope.
    ///
    /// The envelope's pager counts every match while the instance list holds
    /// only the requested page, ordered by last update (most recent first).
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn search(&self, query: &SearchQuery) -> Result<SearchResults>;

    /// Adds or replaces a program by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn put_program(&mut self, program: &Program) -> Result<()>;

    /// Adds or replaces an attribute definition by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn put_attribute(&mut self, attribute: &TrackedEntityAttribute) -> Result<()>;

    /// Adds or replaces a tracked-entity instance by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn put_instance(&mut self, instance: &TrackedEntityInstance) -> Result<()>;

    /// Adds or replaces multiple instances in a single operation.
    ///
    /// More efficient than calling [`Storage::put_instance`] in a loop because
    /// the backend persists once at the end. Returns the number of stored
    /// instances.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch operation fails. Some backends may perform
    /// partial writes before failing.
    fn put_instances_batch(&mut self, instances: &[TrackedEntityInstance]) -> Result<usize>;

    /// Flushes pending changes to the underlying medium.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    fn save(&mut self) -> Result<()>;
}
