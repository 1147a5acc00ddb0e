//! Actions representing side effects to be executed by the runtime.
//!
//! This module defines the [`Action`] type, which represents imperative
//! commands produced by the event handler after processing user input.
//! Actions bridge pure state transformations and effectful operations like
//! driving the presenter or shutting down the terminal loop.
//!
//! # Architecture
//!
//! The event handler returns a `Vec<Action>` after processing each event,
//! allowing multiple side effects to be queued atomically. The runtime
//! executes these actions in sequence, routing presenter notifications to
//! [`SearchPresenter`](crate::app::SearchPresenter) methods.
//!
//! # Example
//!
//! ```rust
//! use teisearch::app::Action;
//!
//! let actions = vec![Action::Search, Action::Quit];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::domain::Program;

/// Commands representing side effects to be executed by the runtime.
///
/// Actions are produced by the event handler and executed by the runtime
/// loop. Most variants are presenter notifications: the view layer reports
/// what the user did and the presenter decides what to search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Tears down the terminal and exits the application.
    Quit,

    /// Re-initializes the presenter.
    ///
    /// Emitted when the screen is first entered and every time the terminal
    /// regains focus, so the catalog and results are refreshed on resume.
    InitPresenter,

    /// Notifies the presenter of a confirmed program selection.
    ///
    /// `None` clears the program scope back to the full catalog.
    SetProgram(Option<Program>),

    /// Notifies the presenter of an edited attribute value.
    ///
    /// Sent on every edit so the result list tracks the form live.
    SetAttributeValue {
        /// Attribute whose value changed.
        attribute_id: String,
        /// New value; empty removes the filter.
        value: String,
    },

    /// Notifies the presenter of an edited global query.
    SetQuery(String),

    /// Asks the presenter to run the search with its current filters.
    Search,

    /// Asks the presenter to open the date picker for an attribute.
    PickDate {
        /// Date attribute to edit.
        attribute_id: String,
    },

    /// Asks the presenter to drop every filter and re-run the search.
    ClearFilters,
}
