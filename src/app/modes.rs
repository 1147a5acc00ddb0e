//! Focus state types for the search screen.
//!
//! This module defines the state machine enum that controls which panel of the
//! screen receives keyboard input. The modal date-picker overlay sits above
//! focus entirely: while it is open, every key belongs to the overlay.
//!
//! # State Machine
//!
//! Focus cycles through the four panels in visual order:
//!
//! ```text
//! Form → Programs → Results → Query → Form → …
//! ```
//!
//! # Example
//!
//! ```rust
//! use teisearch::app::Focus;
//!
//! let focus = Focus::Form;
//! assert_eq!(focus.next(), Focus::Programs);
//! assert_eq!(Focus::Query.next(), Focus::Form);
//! ```

/// The panel currently receiving keyboard input.
///
/// Controls which keybindings are active and how character input is processed.
/// Determines the displayed footer text and the highlighted panel border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The dynamic attribute form.
    ///
    /// Up/Down move between fields, characters edit the focused field,
    /// Left/Right cycle options, Enter opens the date picker on date fields
    /// and submits the search otherwise.
    Form,

    /// The program selector.
    ///
    /// Up/Down move over the placeholder and program entries, Enter confirms
    /// the selection.
    Programs,

    /// The inline result preview rows.
    ///
    /// Up/Down move the row cursor when preview rows are visible.
    Results,

    /// The global query bar.
    ///
    /// Characters edit the query, Enter submits the search, Esc clears the
    /// query and returns focus to the form.
    Query,
}

impl Focus {
    /// Returns the next panel in the focus cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Form => Self::Programs,
            Self::Programs => Self::Results,
            Self::Results => Self::Query,
            Self::Query => Self::Form,
        }
    }

    /// Returns the previous panel in the focus cycle.
    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            Self::Form => Self::Query,
            Self::Programs => Self::Form,
            Self::Results => Self::Programs,
            Self::Query => Self::Results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycle_is_closed_in_both_directions() {
        let mut focus = Focus::Form;
        for _ in 0..4 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Form);

        for _ in 0..4 {
            focus = focus.prev();
        }
        assert_eq!(focus, Focus::Form);
    }
}
