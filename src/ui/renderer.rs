//! Top-level rendering coordinator.
//!
//! This module provides the main rendering entry point, coordinating view
//! model computation and delegation to UI components. It owns the vertical
//! layout and the modal overlay ordering.
//!
//! # Architecture
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to specialized component renderers

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::Frame;

use crate::app::{AppState, INLINE_PREVIEW_MAX};
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Result panel height: borders, counter line, table header, and the
/// largest inline preview.
const RESULTS_PANEL_HEIGHT: u16 = INLINE_PREVIEW_MAX as u16 + 4;

/// Height of the collapsed program selector including borders.
const COLLAPSED_SELECTOR_HEIGHT: u16 = 3;

/// Renders the search screen into the given frame.
///
/// Computes the view model from application state, lays the panels out
/// vertically, and delegates each area to its component renderer. The modal
/// date picker, when open, is drawn last so it sits above every panel.
///
/// # Parameters
///
/// * `frame` - Frame to render into
/// * `state` - Current application state
///
/// # Layout
///
/// ```text
/// ┌──────────────────────────────┐
/// │ header (1 row)               │
/// │ query bar (3 rows)           │
/// │ program selector (3+ rows)   │
/// │ attribute form (fill)        │
/// │ results (fixed)              │
/// │ footer (1 row)               │
/// └──────────────────────────────┘
/// ```
pub fn render(frame: &mut Frame, state: &AppState) {
    let viewmodel = state.compute_viewmodel(frame.area().width as usize);
    render_viewmodel(frame, &viewmodel, &state.theme);
}

/// Lays out one frame from a pre-computed view model.
fn render_viewmodel(frame: &mut Frame, vm: &UIViewModel, theme: &Theme) {
    let area = frame.area();

    let selector_height = if vm.selector.is_expanded {
        (vm.selector.entries.len() as u16).saturating_add(2)
    } else {
        COLLAPSED_SELECTOR_HEIGHT
    };

    let [header_area, query_area, selector_area, form_area, results_area, footer_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(selector_height),
            Constraint::Fill(1),
            Constraint::Length(RESULTS_PANEL_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(area);

    components::render_header(frame, header_area, &vm.header, theme);
    components::render_footer(frame, footer_area, &vm.footer, theme);

    if let Some(empty) = &vm.empty_state {
        let body = body_area(query_area, results_area);
        components::render_empty_state(frame, body, empty, theme);
        return;
    }

    components::render_query_bar(frame, query_area, &vm.query_bar, theme);
    components::render_selector(frame, selector_area, &vm.selector, theme);
    components::render_form(frame, form_area, &vm.form, theme);
    components::render_results(frame, results_area, &vm.results, theme);

    if let Some(picker) = &vm.date_picker {
        components::render_date_picker(frame, picker, theme);
    }
}

/// Joins the rows between header and footer into one area for the empty
/// state message.
fn body_area(top: Rect, bottom: Rect) -> Rect {
    Rect {
        x: top.x,
        y: top.y,
        width: top.width,
        height: bottom.y.saturating_add(bottom.height).saturating_sub(top.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SearchView;
    use crate::domain::{
        AttributeField, Pager, Program, SearchResults, TrackedEntityAttribute,
        TrackedEntityInstance, ValueType,
    };
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn draw(state: &AppState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| render(frame, state))
            .expect("draw frame");
        buffer_to_string(terminal.backend().buffer())
    }

    fn buffer_to_string(buf: &Buffer) -> String {
        let mut lines = Vec::new();
        for y in 0..buf.area.height {
            let mut line = String::new();
            for x in 0..buf.area.width {
                line.push_str(buf[(x, y)].symbol());
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    fn catalog_state() -> AppState {
        let mut state = AppState::new(Theme::default());
        let fields = vec![
            AttributeField::new(TrackedEntityAttribute::new(
                "attr-first",
                "First name",
                ValueType::Text,
            )),
            AttributeField::new(TrackedEntityAttribute::new(
                "attr-gender",
                "Gender",
                ValueType::Text,
            )),
        ];
        state.set_form(fields, None);
        state.set_programs(vec![Program::new("p1", "Child Programme", vec![])]);
        state
    }

    fn envelope(total: usize, ids: &[&str]) -> SearchResults {
        SearchResults {
            pager: Pager::for_total(1, 50, total),
            instances: ids
                .iter()
                .map(|id| TrackedEntityInstance::new(*id, "Ngelehun CHC"))
                .collect(),
        }
    }

    #[test]
    fn the_counter_and_preview_rows_reach_the_buffer() {
        let mut state = catalog_state();
        state.swap_data(envelope(3, &["tei-ana", "tei-bob", "tei-cleo"]));

        let screen = draw(&state);

        assert!(screen.contains("3 results found"), "screen:\n{screen}");
        assert!(screen.contains("tei-ana"), "screen:\n{screen}");
        assert!(screen.contains("tei-cleo"), "screen:\n{screen}");
        assert!(screen.contains("Ngelehun CHC"), "screen:\n{screen}");
    }

    #[test]
    fn a_large_total_shows_the_counter_but_no_rows() {
        let mut state = catalog_state();
        state.swap_data(envelope(57, &["tei-ana", "tei-bob"]));

        let screen = draw(&state);

        assert!(screen.contains("57 results found"), "screen:\n{screen}");
        assert!(!screen.contains("tei-ana"), "screen:\n{screen}");
        assert!(
            screen.contains("Narrow the search to preview rows"),
            "screen:\n{screen}"
        );
    }

    #[test]
    fn a_zero_total_shows_the_no_match_hint() {
        let mut state = catalog_state();
        state.swap_data(envelope(0, &[]));

        let screen = draw(&state);

        assert!(screen.contains("0 results found"), "screen:\n{screen}");
        assert!(
            screen.contains("No matches for the current filters"),
            "screen:\n{screen}"
        );
    }

    #[test]
    fn an_unloaded_catalog_renders_the_empty_state() {
        let state = AppState::new(Theme::default());

        let screen = draw(&state);

        assert!(screen.contains("No catalog loaded"), "screen:\n{screen}");
        assert!(screen.contains("Tracked Entity Search"), "screen:\n{screen}");
    }

    #[test]
    fn form_labels_and_program_scope_are_visible() {
        let state = catalog_state();

        let screen = draw(&state);

        assert!(screen.contains("First name"), "screen:\n{screen}");
        assert!(screen.contains("Gender"), "screen:\n{screen}");
        assert!(screen.contains("All programs"), "screen:\n{screen}");
    }

    #[test]
    fn the_date_picker_overlays_the_screen() {
        use crate::app::DateDialogRequest;

        let mut state = catalog_state();
        state.show_date_dialog(DateDialogRequest {
            attribute_id: "attr-dob".to_string(),
            label: "Date of birth".to_string(),
            listener: Box::new(|_| {}),
        });

        let screen = draw(&state);

        assert!(screen.contains("Date of birth"), "screen:\n{screen}");
        assert!(screen.contains("Enter: pick"), "screen:\n{screen}");
    }
}
