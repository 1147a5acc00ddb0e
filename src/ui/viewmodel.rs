//! View model types representing renderable UI state.
//!
//! This module defines immutable view models computed from application state,
//! following the MVVM pattern. View models are optimized for rendering and
//! contain pre-computed display strings, cursor flags, and panel focus state.
//!
//! # Architecture
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the renderer. They contain no business logic, only display-ready data.
//!
//! # Example
//!
//! ```rust,no_run
//! use teisearch::ui::viewmodel::{FooterInfo, HeaderInfo};
//!
//! let header = HeaderInfo {
//!     title: " Tracked Entity Search (All programs) ".to_string(),
//! };
//! let footer = FooterInfo {
//!     text: "ESC: quit".to_string(),
//!     is_status: false,
//! };
//! ```

use crate::app::DateSegment;

/// Complete UI view model for rendering.
///
/// Contains all display information needed to render one frame. The view
/// model is computed from `AppState` and includes pre-formatted rows for
/// every panel plus the optional modal date picker.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// Header information (title, program scope).
    pub header: HeaderInfo,

    /// Global query bar state.
    pub query_bar: QueryBarInfo,

    /// Program selector panel state.
    pub selector: SelectorViewModel,

    /// Attribute form panel state.
    pub form: FormViewModel,

    /// Result preview panel state.
    pub results: ResultsViewModel,

    /// Footer information (keybindings or status line).
    pub footer: FooterInfo,

    /// Optional empty state shown before any catalog has loaded.
    pub empty_state: Option<EmptyState>,

    /// Modal date picker, rendered above everything else when present.
    pub date_picker: Option<DatePickerInfo>,
}

/// Header display information.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    /// Title text to display in the header.
    pub title: String,
}

/// Footer display information.
///
/// Carries either keybinding hints or a transient status message; the
/// renderer styles the two differently.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Keybinding help text or status message.
    pub text: String,

    /// Whether `text` is a status message rather than keybindings.
    pub is_status: bool,
}

/// Global query bar display information.
#[derive(Debug, Clone)]
pub struct QueryBarInfo {
    /// Current query text.
    pub query: String,

    /// Whether the query bar has keyboard focus.
    pub is_focused: bool,
}

/// Program selector panel state.
///
/// Rendered collapsed to a single line when unfocused and expanded to the
/// full entry list while the user is choosing a program.
#[derive(Debug, Clone)]
pub struct SelectorViewModel {
    /// All selectable entries, placeholder first.
    pub entries: Vec<SelectorEntry>,

    /// Label of the confirmed selection for the collapsed rendering.
    pub collapsed_label: String,

    /// Whether the entry list should be rendered in full.
    pub is_expanded: bool,

    /// Whether the selector has keyboard focus.
    pub is_focused: bool,
}

/// One entry in the program selector.
#[derive(Debug, Clone)]
pub struct SelectorEntry {
    /// Display label (placeholder text or program name).
    pub label: String,

    /// Whether the movement cursor is on this entry.
    pub is_cursor: bool,

    /// Whether this entry is the confirmed selection.
    pub is_selected: bool,
}

/// Attribute form panel state.
#[derive(Debug, Clone)]
pub struct FormViewModel {
    /// One row per attribute field, in catalog order.
    pub rows: Vec<FormRow>,

    /// Whether the form has keyboard focus.
    pub is_focused: bool,
}

/// One row in the attribute form.
#[derive(Debug, Clone)]
pub struct FormRow {
    /// Attribute label.
    pub label: String,

    /// Entered value, possibly empty.
    pub value: String,

    /// Secondary hint describing how the field is edited.
    pub detail: Option<String>,

    /// Whether the movement cursor is on this row.
    pub is_cursor: bool,
}

/// Result preview panel state.
#[derive(Debug, Clone)]
pub struct ResultsViewModel {
    /// Counter label, absent until the first search result arrives.
    pub counter_label: Option<String>,

    /// Inline preview rows; empty when the total is zero or too large.
    pub rows: Vec<ResultRow>,

    /// Hint explaining why no rows are shown, when applicable.
    pub hint: Option<String>,

    /// Whether the result panel has keyboard focus.
    pub is_focused: bool,
}

/// One inline preview row.
#[derive(Debug, Clone)]
pub struct ResultRow {
    /// Attribute values joined for display.
    pub summary: String,

    /// Organisation unit of the instance.
    pub org_unit: String,

    /// Relative last-updated text (e.g. "3h ago").
    pub updated: String,

    /// Whether the movement cursor is on this row.
    pub is_cursor: bool,
}

/// Empty state message display information.
///
/// Shown across the form and result area before any catalog has loaded.
#[derive(Debug, Clone)]
pub struct EmptyState {
    /// Primary message (e.g. "No catalog loaded").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}

/// Modal date picker display information.
#[derive(Debug, Clone)]
pub struct DatePickerInfo {
    /// Picker title, derived from the field label.
    pub title: String,

    /// Year segment, zero padded to four digits.
    pub year: String,

    /// Month segment, zero padded to two digits.
    pub month: String,

    /// Day segment, zero padded to two digits.
    pub day: String,

    /// The segment currently receiving adjustments.
    pub focused_segment: DateSegment,
}
