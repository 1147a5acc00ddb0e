//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input
//! and lifecycle events, translating them into state changes and action
//! sequences. It serves as the primary control flow coordinator for the
//! search screen.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the terminal runtime
//! 2. [`handle_event`] pattern-matches the event type
//! 3. View-local mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! The runtime executes the returned [`Action`]s, which is where presenter
//! notifications leave the view layer. While the date-picker overlay is open
//! it consumes all input; only the hard quit key passes through.
//!
//! # Event Types
//!
//! Events fall into several categories:
//! - **Navigation**: `CursorDown`, `CursorUp`, `FocusNext`, `FocusPrev`
//! - **Editing**: `Char`, `Backspace`, `Left`, `Right`
//! - **Submission**: `Confirm`, `ClearFilters`
//! - **Lifecycle**: `Resumed`, `Resized`, `Escape`, `Quit`
//!
//! # Example
//!
//! ```rust
//! use teisearch::app::{handle_event, AppState, Event};
//! use teisearch::ui::theme::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! let (render, actions) = handle_event(&mut state, &Event::FocusNext)?;
//! assert!(render);
//! assert!(actions.is_empty());
//! # Ok::<(), teisearch::domain::TeiSearchError>(())
//! ```

use super::actions::Action;
use super::modes::Focus;
use super::state::AppState;
use crate::domain::Result;

/// User input and lifecycle events delivered by the runtime.
///
/// Raw terminal keys are mapped to these events in the runtime so the
/// handler stays independent of the input backend. The handler processes
/// them sequentially, ensuring deterministic state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The screen was entered or the terminal regained focus.
    ///
    /// Triggers presenter re-initialization so the catalog and results are
    /// fresh on every resume.
    Resumed,

    /// The terminal was resized; the next frame repaints everything.
    Resized,

    /// Moves focus to the next panel (Tab).
    FocusNext,

    /// Moves focus to the previous panel (Shift+Tab).
    FocusPrev,

    /// Moves the focused cursor down (Down arrow, Ctrl+n).
    CursorDown,

    /// Moves the focused cursor up (Up arrow, Ctrl+p).
    CursorUp,

    /// Left arrow: previous option value, or previous picker segment.
    Left,

    /// Right arrow: next option value, or next picker segment.
    Right,

    /// Appends a character to the focused editor.
    Char(char),

    /// Deletes backwards in the focused editor.
    Backspace,

    /// Enter: confirms the focused entry or submits the search.
    Confirm,

    /// Escape: cancels the overlay, leaves the panel, or quits from the form.
    Escape,

    /// Resets every filter (Ctrl+l).
    ClearFilters,

    /// Hard quit (Ctrl+c), honored even while the overlay is open.
    Quit,
}

/// Applies an event to the state and returns follow-up effects.
///
/// # Parameters
///
/// * `state` - Application state to mutate
/// * `event` - Event to process
///
/// # Returns
///
/// A tuple `(should_render, actions)`: whether the frame must be repainted,
/// and the side effects the runtime should execute in order.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the signature uniform with the
/// rest of the call chain so arms may fail later without churn.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event = ?event).entered();

    // Any fresh keypress retires a lingering status line.
    if !matches!(event, Event::Resumed | Event::Resized) {
        state.status = None;
    }

    if state.date_overlay.is_some() {
        return handle_overlay_event(state, event);
    }

    match event {
        Event::Quit => Ok((false, vec![Action::Quit])),
        Event::Resumed => Ok((true, vec![Action::InitPresenter])),
        Event::Resized => Ok((true, vec![])),
        Event::FocusNext => {
            state.focus = state.focus.next();
            Ok((true, vec![]))
        }
        Event::FocusPrev => {
            state.focus = state.focus.prev();
            Ok((true, vec![]))
        }
        Event::CursorDown => {
            state.move_cursor_down();
            Ok((true, vec![]))
        }
        Event::CursorUp => {
            state.move_cursor_up();
            Ok((true, vec![]))
        }
        Event::Char(c) => handle_char(state, *c),
        Event::Backspace => handle_backspace(state),
        Event::Left => handle_option_cycle(state, -1),
        Event::Right => handle_option_cycle(state, 1),
        Event::Confirm => handle_confirm(state),
        Event::Escape => handle_escape(state),
        Event::ClearFilters => {
            state.clear_filter_values();
            Ok((true, vec![Action::ClearFilters]))
        }
    }
}

/// Routes input while the modal date picker is open.
///
/// Every key belongs to the picker: segments move with Left/Right, values
/// adjust with Up/Down, Enter confirms and fires the listener, Escape
/// cancels. All other input is swallowed.
fn handle_overlay_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    match event {
        Event::Quit => Ok((false, vec![Action::Quit])),
        Event::Left => {
            if let Some(overlay) = state.date_overlay.as_mut() {
                overlay.focus_prev_segment();
            }
            Ok((true, vec![]))
        }
        Event::Right => {
            if let Some(overlay) = state.date_overlay.as_mut() {
                overlay.focus_next_segment();
            }
            Ok((true, vec![]))
        }
        Event::CursorUp => {
            if let Some(overlay) = state.date_overlay.as_mut() {
                overlay.bump(1);
            }
            Ok((true, vec![]))
        }
        Event::CursorDown => {
            if let Some(overlay) = state.date_overlay.as_mut() {
                overlay.bump(-1);
            }
            Ok((true, vec![]))
        }
        Event::Confirm => {
            if let Some(overlay) = state.date_overlay.take() {
                overlay.confirm();
            }
            Ok((true, vec![]))
        }
        Event::Escape => {
            state.date_overlay = None;
            Ok((true, vec![]))
        }
        _ => Ok((false, vec![])),
    }
}

/// Routes a typed character into the focused editor.
///
/// Query focus edits the global query live. Form focus edits the focused
/// field subject to its kind: option and date fields ignore typed text, and
/// number fields accept only ASCII digits.
fn handle_char(state: &mut AppState, c: char) -> Result<(bool, Vec<Action>)> {
    match state.focus {
        Focus::Query => {
            state.query.push(c);
            let query = state.query.clone();
            Ok((true, vec![Action::SetQuery(query)]))
        }
        Focus::Form => match state.focused_field_mut() {
            Some(field) if field.accepts_char(c) => {
                field.value.push(c);
                let action = Action::SetAttributeValue {
                    attribute_id: field.attribute.id.clone(),
                    value: field.value.clone(),
                };
                Ok((true, vec![action]))
            }
            _ => Ok((false, vec![])),
        },
        Focus::Programs | Focus::Results => Ok((false, vec![])),
    }
}

/// Deletes backwards in the focused editor.
///
/// Option and date fields clear entirely, since their values are picked
/// rather than typed.
fn handle_backspace(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    match state.focus {
        Focus::Query => {
            if state.query.pop().is_none() {
                return Ok((false, vec![]));
            }
            let query = state.query.clone();
            Ok((true, vec![Action::SetQuery(query)]))
        }
        Focus::Form => match state.focused_field_mut() {
            Some(field) if !field.value.is_empty() => {
                if field.is_picked() {
                    field.value.clear();
                } else {
                    field.value.pop();
                }
                let action = Action::SetAttributeValue {
                    attribute_id: field.attribute.id.clone(),
                    value: field.value.clone(),
                };
                Ok((true, vec![action]))
            }
            _ => Ok((false, vec![])),
        },
        Focus::Programs | Focus::Results => Ok((false, vec![])),
    }
}

/// Cycles an option field through its choices.
///
/// The cycle includes an empty slot meaning "no filter", so `n` options give
/// `n + 1` positions in both directions.
fn handle_option_cycle(state: &mut AppState, direction: i32) -> Result<(bool, Vec<Action>)> {
    if state.focus != Focus::Form {
        return Ok((false, vec![]));
    }
    match state.focused_field_mut() {
        Some(field) if field.attribute.has_options() => {
            let options = &field.attribute.options;
            let slots = options.len() as i32 + 1;
            let current = options
                .iter()
                .position(|option| option == &field.value)
                .map_or(0, |index| index as i32 + 1);
            let next = (current + direction).rem_euclid(slots);

            field.value = if next == 0 {
                String::new()
            } else {
                options[(next - 1) as usize].clone()
            };
            let action = Action::SetAttributeValue {
                attribute_id: field.attribute.id.clone(),
                value: field.value.clone(),
            };
            Ok((true, vec![action]))
        }
        _ => Ok((false, vec![])),
    }
}

/// Confirms the focused entry.
///
/// Program focus applies the selection under the cursor, mapping the
/// placeholder to `None`, and returns focus to the form. Date fields open
/// the picker; everything else submits the search.
fn handle_confirm(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    match state.focus {
        Focus::Programs => {
            let selection = state.selector.confirm();
            state.focus = Focus::Form;
            tracing::debug!(
                program = selection.as_ref().map(|p| p.id.as_str()),
                "program selection confirmed"
            );
            Ok((true, vec![Action::SetProgram(selection)]))
        }
        Focus::Form => match state.focused_field() {
            Some(field) if field.opens_picker() => {
                let attribute_id = field.attribute.id.clone();
                Ok((true, vec![Action::PickDate { attribute_id }]))
            }
            _ => Ok((true, vec![Action::Search])),
        },
        Focus::Query => Ok((true, vec![Action::Search])),
        Focus::Results => Ok((false, vec![])),
    }
}

/// Handles Escape outside the overlay.
///
/// From the form it quits the application, mirroring a back press on the
/// search screen. From any other panel it returns focus to the form, and
/// from the query bar it also clears the query.
fn handle_escape(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    match state.focus {
        Focus::Form => Ok((false, vec![Action::Quit])),
        Focus::Query => {
            state.focus = Focus::Form;
            if state.query.is_empty() {
                return Ok((true, vec![]));
            }
            state.query.clear();
            Ok((true, vec![Action::SetQuery(String::new())]))
        }
        Focus::Programs | Focus::Results => {
            state.focus = Focus::Form;
            Ok((true, vec![]))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::app::view::{DateDialogRequest, SearchView};
    use crate::domain::{AttributeField, Program, TrackedEntityAttribute, ValueType};
    use crate::ui::theme::Theme;

    fn state_with_form(specs: &[(&str, ValueType)]) -> AppState {
        let mut state = AppState::new(Theme::default());
        let fields = specs
            .iter()
            .map(|(id, value_type)| {
                AttributeField::new(TrackedEntityAttribute::new(*id, *id, *value_type))
            })
            .collect();
        state.set_form(fields, None);
        state
    }

    fn handle(state: &mut AppState, event: Event) -> (bool, Vec<Action>) {
        handle_event(state, &event).unwrap()
    }

    #[test]
    fn resumed_requests_presenter_initialization() {
        let mut state = AppState::new(Theme::default());
        let (render, actions) = handle(&mut state, Event::Resumed);

        assert!(render);
        assert_eq!(actions, vec![Action::InitPresenter]);
    }

    #[test]
    fn escape_from_the_form_quits() {
        let mut state = AppState::new(Theme::default());
        let (_, actions) = handle(&mut state, Event::Escape);
        assert_eq!(actions, vec![Action::Quit]);
    }

    #[test]
    fn tab_cycles_focus_and_escape_returns_to_the_form() {
        let mut state = AppState::new(Theme::default());

        handle(&mut state, Event::FocusNext);
        assert_eq!(state.focus, Focus::Programs);
        handle(&mut state, Event::Escape);
        assert_eq!(state.focus, Focus::Form);
    }

    #[test]
    fn typing_in_the_query_bar_notifies_live() {
        let mut state = AppState::new(Theme::default());
        state.focus = Focus::Query;

        handle(&mut state, Event::Char('o'));
        let (_, actions) = handle(&mut state, Event::Char('k'));

        assert_eq!(state.query, "ok");
        assert_eq!(actions, vec![Action::SetQuery("ok".to_string())]);
    }

    #[test]
    fn typing_into_a_text_field_updates_and_notifies() {
        let mut state = state_with_form(&[("first-name", ValueType::Text)]);

        let (render, actions) = handle(&mut state, Event::Char('A'));

        assert!(render);
        assert_eq!(
            actions,
            vec![Action::SetAttributeValue {
                attribute_id: "first-name".to_string(),
                value: "A".to_string(),
            }]
        );
    }

    #[test]
    fn number_fields_accept_only_digits() {
        let mut state = state_with_form(&[("phone", ValueType::Number)]);

        let (render, actions) = handle(&mut state, Event::Char('x'));
        assert!(!render);
        assert!(actions.is_empty());

        handle(&mut state, Event::Char('0'));
        assert_eq!(state.focused_field().unwrap().value, "0");
    }

    #[test]
    fn option_fields_cycle_through_choices_and_the_empty_slot() {
        let mut state = AppState::new(Theme::default());
        let attribute = TrackedEntityAttribute::with_options(
            "gender",
            "Gender",
            vec!["Female".to_string(), "Male".to_string()],
        );
        state.set_form(vec![AttributeField::new(attribute)], None);

        handle(&mut state, Event::Right);
        assert_eq!(state.focused_field().unwrap().value, "Female");
        handle(&mut state, Event::Right);
        assert_eq!(state.focused_field().unwrap().value, "Male");
        let (_, actions) = handle(&mut state, Event::Right);
        assert_eq!(state.focused_field().unwrap().value, "");
        assert_eq!(
            actions,
            vec![Action::SetAttributeValue {
                attribute_id: "gender".to_string(),
                value: String::new(),
            }]
        );

        handle(&mut state, Event::Left);
        assert_eq!(state.focused_field().unwrap().value, "Male");
    }

    #[test]
    fn typed_text_is_ignored_on_date_fields() {
        let mut state = state_with_form(&[("date-of-birth", ValueType::Date)]);

        let (render, actions) = handle(&mut state, Event::Char('1'));

        assert!(!render);
        assert!(actions.is_empty());
        assert!(state.focused_field().unwrap().value.is_empty());
    }

    #[test]
    fn enter_on_a_date_field_requests_the_picker() {
        let mut state = state_with_form(&[("date-of-birth", ValueType::Date)]);

        let (_, actions) = handle(&mut state, Event::Confirm);

        assert_eq!(
            actions,
            vec![Action::PickDate {
                attribute_id: "date-of-birth".to_string(),
            }]
        );
    }

    #[test]
    fn enter_on_a_text_field_submits_the_search() {
        let mut state = state_with_form(&[("first-name", ValueType::Text)]);
        let (_, actions) = handle(&mut state, Event::Confirm);
        assert_eq!(actions, vec![Action::Search]);
    }

    #[test]
    fn program_confirm_maps_placeholder_and_entries_to_the_right_scope() {
        let mut state = AppState::new(Theme::default());
        state.set_programs(vec![
            Program::new("p1", "Maternal and Child Health", vec![]),
            Program::new("p2", "TB Control", vec![]),
        ]);
        state.focus = Focus::Programs;

        let (_, actions) = handle(&mut state, Event::Confirm);
        assert_eq!(actions, vec![Action::SetProgram(None)]);
        assert_eq!(state.focus, Focus::Form);

        state.focus = Focus::Programs;
        handle(&mut state, Event::CursorDown);
        let (_, actions) = handle(&mut state, Event::Confirm);
        match &actions[..] {
            [Action::SetProgram(Some(program))] => assert_eq!(program.id, "p1"),
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn overlay_swallows_text_and_confirm_fires_the_listener() {
        let mut state = state_with_form(&[("date-of-birth", ValueType::Date)]);
        let (tx, rx) = mpsc::channel();
        state.show_date_dialog(DateDialogRequest {
            attribute_id: "date-of-birth".to_string(),
            label: "Date of birth".to_string(),
            listener: Box::new(move |picked| {
                tx.send(picked).unwrap();
            }),
        });

        let (render, actions) = handle(&mut state, Event::Char('z'));
        assert!(!render);
        assert!(actions.is_empty());

        handle(&mut state, Event::CursorUp);
        handle(&mut state, Event::Confirm);

        assert!(state.date_overlay.is_none());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn overlay_escape_cancels_without_firing_the_listener() {
        let mut state = AppState::new(Theme::default());
        let (tx, rx) = mpsc::channel();
        state.show_date_dialog(DateDialogRequest {
            attribute_id: "attr".to_string(),
            label: "When".to_string(),
            listener: Box::new(move |picked| {
                tx.send(picked).unwrap();
            }),
        });

        handle(&mut state, Event::Escape);

        assert!(state.date_overlay.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn clear_filters_blanks_locally_and_notifies() {
        let mut state = state_with_form(&[("first-name", ValueType::Text)]);
        handle(&mut state, Event::Char('A'));
        state.query = "awino".to_string();

        let (_, actions) = handle(&mut state, Event::ClearFilters);

        assert_eq!(actions, vec![Action::ClearFilters]);
        assert!(state.focused_field().unwrap().value.is_empty());
        assert!(state.query.is_empty());
    }

    #[test]
    fn a_keypress_retires_the_status_line() {
        let mut state = AppState::new(Theme::default());
        state.show_status("search failed".to_string());

        handle(&mut state, Event::CursorDown);

        assert!(state.status.is_none());
    }

    #[test]
    fn backspace_clears_picked_values_whole() {
        let mut state = state_with_form(&[("date-of-birth", ValueType::Date)]);
        if let Some(field) = state.focused_field_mut() {
            field.value = "1990-02-14".to_string();
        }

        let (_, actions) = handle(&mut state, Event::Backspace);

        assert!(state.focused_field().unwrap().value.is_empty());
        assert_eq!(
            actions,
            vec![Action::SetAttributeValue {
                attribute_id: "date-of-birth".to_string(),
                value: String::new(),
            }]
        );
    }
}
