//! Search worker message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the UI thread
//! and the background worker thread that owns the storage backend. Commands and
//! outcomes travel over std mpsc channels as plain typed values.
//!
//! Every search execution carries a generation number. The UI thread stamps
//! each dispatch with a fresh generation and ignores outcomes carrying an older
//! one, so a newer search simply supersedes anything still in flight.

use crate::domain::entity::{Program, SearchResults, TrackedEntityAttribute};
use crate::domain::query::SearchQuery;

/// Commands sent from the UI thread to the worker thread.
///
/// Each variant corresponds to a storage operation that should be performed
/// off the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    /// Load the program and attribute catalog from storage.
    LoadCatalog,

    /// Execute a search query and return the paged result envelope.
    Execute {
        /// Generation stamp used to drop superseded responses.
        generation: u64,

        /// The query snapshot to execute.
        query: SearchQuery,
    },

    /// Stop the worker loop. Storage flushes when the worker drops it.
    Shutdown,
}

impl SearchCommand {
    /// Creates a catalog-load command.
    #[must_use]
    pub fn load_catalog() -> Self {
        Self::LoadCatalog
    }

    /// Creates a search command stamped with the given generation.
    #[must_use]
    pub fn execute(generation: u64, query: SearchQuery) -> Self {
        Self::Execute { generation, query }
    }
}

/// Outcomes sent from the worker thread back to the UI thread.
///
/// Each variant corresponds to the completion of a worker operation, either
/// successfully with result data or with an error message the presenter
/// translates into renderable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The program and attribute catalog was loaded from storage.
    CatalogLoaded {
        /// All programs, in selector order.
        programs: Vec<Program>,

        /// All attribute definitions, in form order.
        attributes: Vec<TrackedEntityAttribute>,
    },

    /// A search execution finished.
    ResultsReady {
        /// Generation stamp of the dispatch this answers.
        generation: u64,

        /// The paged result envelope.
        results: SearchResults,
    },

    /// A worker operation failed.
    Failed {
        /// Generation stamp when the failure belongs to a search dispatch.
        generation: Option<u64>,

        /// Human-readable error message.
        message: String,
    },
}
