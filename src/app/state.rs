//! Application state management and view model computation.
//!
//! This module defines [`AppState`], the central state container for the
//! search screen, along with cursor movement, the [`SearchView`]
//! implementation the presenter pushes into, and UI view model generation.
//! It serves as the single source of truth for all transient UI state.
//!
//! # Architecture
//!
//! `AppState` holds what the screen currently shows: the attribute form, the
//! program selector, the result preview, the query bar, and the optional
//! date-picker overlay. The presenter replaces these wholesale through the
//! [`SearchView`] methods; the event handler mutates cursors and field text
//! in response to user input. View models are computed on demand from state
//! snapshots.
//!
//! # State Components
//!
//! - **Form**: Lazily bound list of attribute fields for the current scope
//! - **Selector**: Program entries behind a fixed placeholder, rebuilt on
//!   every push
//! - **Results**: Lazily bound preview rows plus the counter label
//! - **Query**: Global fuzzy query text
//! - **Overlay**: Modal date picker, owning all input while open
//!
//! # View Model Computation
//!
//! The `compute_viewmodel` method transforms state into a renderable UI
//! representation, handling row formatting, focus flags, and the footer
//! keybinding or status line.
//!
//! # Example
//!
//! ```rust
//! use teisearch::app::AppState;
//! use teisearch::ui::theme::Theme;
//!
//! let state = AppState::new(Theme::default());
//! assert!(state.counter_label.is_none());
//! let viewmodel = state.compute_viewmodel(80);
//! assert!(viewmodel.empty_state.is_some());
//! ```

use chrono::Datelike;

use super::modes::Focus;
use super::view::{
    Binding, DateDialogRequest, DateOverlay, ProgramSelect, RenderableList, RowList, SearchView,
    INLINE_PREVIEW_MAX, PROGRAM_PLACEHOLDER,
};
use crate::domain::{
    AttributeField, Program, SearchResults, TrackedEntityAttribute, TrackedEntityInstance,
    ValueType,
};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DatePickerInfo, EmptyState, FooterInfo, FormRow, FormViewModel, HeaderInfo, QueryBarInfo,
    ResultRow, ResultsViewModel, SelectorEntry, SelectorViewModel, UIViewModel,
};

/// Central application state container.
///
/// Holds all transient UI state for the search screen. Mutated by the event
/// handler in response to user input and by the presenter through the
/// [`SearchView`] implementation. View models are computed on demand from
/// state snapshots.
#[derive(Debug)]
pub struct AppState {
    /// Panel currently receiving keyboard input.
    ///
    /// Ignored while the date-picker overlay is open; the overlay owns all
    /// input until confirmed or cancelled.
    pub focus: Focus,

    /// Attribute form for the current program scope.
    ///
    /// Starts uninitialized and is bound on the first `set_form` push. Later
    /// pushes replace the backing fields in the same binding, preserving the
    /// cursor position where possible.
    pub form: Binding<RowList<AttributeField>>,

    /// Inline result preview rows.
    ///
    /// Starts uninitialized and is bound on the first `swap_data` push.
    /// Cleared on every push; populated only for small result totals.
    pub results: Binding<RowList<TrackedEntityInstance>>,

    /// Program selector entries behind the placeholder.
    ///
    /// Rebuilt from scratch on every `set_programs` push, unlike the lazily
    /// bound form and result lists.
    pub selector: ProgramSelect,

    /// Program scope of the most recent form push.
    ///
    /// `None` means the unscoped form over the full attribute catalog.
    pub scope: Option<Program>,

    /// Global query text, edited in the query bar.
    pub query: String,

    /// Result counter label, absent until the first search completes.
    ///
    /// Reflects the full match total even when the preview is suppressed.
    pub counter_label: Option<String>,

    /// Full match total from the most recent search.
    pub total_results: usize,

    /// Transient status line, typically a failure summary.
    ///
    /// Cleared by the event handler on the next keypress.
    pub status: Option<String>,

    /// Modal date picker, present only while the user is picking a date.
    pub date_overlay: Option<DateOverlay>,

    /// Color scheme for UI rendering.
    pub theme: Theme,
}

impl AppState {
    /// Creates a new application state with the given theme.
    ///
    /// The form and result lists start uninitialized, the selector holds only
    /// the placeholder, and focus begins on the form.
    ///
    /// # Example
    ///
    /// ```rust
    /// use teisearch::app::{AppState, Focus};
    /// use teisearch::ui::theme::Theme;
    ///
    /// let state = AppState::new(Theme::default());
    /// assert_eq!(state.focus, Focus::Form);
    /// assert!(!state.form.is_bound());
    /// ```
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            focus: Focus::Form,
            form: Binding::Uninitialized,
            results: Binding::Uninitialized,
            selector: ProgramSelect::default(),
            scope: None,
            query: String::new(),
            counter_label: None,
            total_results: 0,
            status: None,
            date_overlay: None,
            theme,
        }
    }

    /// Whether any catalog content has arrived yet.
    ///
    /// Used to render a loading or seeding hint instead of empty panels.
    #[must_use]
    pub fn has_catalog(&self) -> bool {
        !self.selector.programs().is_empty() || self.form.is_bound()
    }

    /// Moves the cursor of the focused panel one step down.
    ///
    /// No-op for the query bar and while the overlay is open (the handler
    /// routes overlay keys separately).
    pub fn move_cursor_down(&mut self) {
        match self.focus {
            Focus::Form => {
                if let Some(form) = self.form.as_bound_mut() {
                    form.move_down();
                }
            }
            Focus::Programs => self.selector.move_down(),
            Focus::Results => {
                if let Some(results) = self.results.as_bound_mut() {
                    results.move_down();
                }
            }
            Focus::Query => {}
        }
    }

    /// Moves the cursor of the focused panel one step up.
    pub fn move_cursor_up(&mut self) {
        match self.focus {
            Focus::Form => {
                if let Some(form) = self.form.as_bound_mut() {
                    form.move_up();
                }
            }
            Focus::Programs => self.selector.move_up(),
            Focus::Results => {
                if let Some(results) = self.results.as_bound_mut() {
                    results.move_up();
                }
            }
            Focus::Query => {}
        }
    }

    /// The form field under the cursor, if the form is bound and non-empty.
    #[must_use]
    pub fn focused_field(&self) -> Option<&AttributeField> {
        self.form.as_bound().and_then(RowList::selected)
    }

    /// Mutable access to the form field under the cursor.
    pub fn focused_field_mut(&mut self) -> Option<&mut AttributeField> {
        self.form.as_bound_mut().and_then(RowList::selected_mut)
    }

    /// Blanks every form field value and the query text.
    ///
    /// Local echo of a filter reset; the presenter separately clears its own
    /// record and re-runs the search.
    pub fn clear_filter_values(&mut self) {
        if let Some(form) = self.form.as_bound_mut() {
            for field in form.items_mut() {
                field.value.clear();
            }
        }
        self.query.clear();
    }

    /// Computes a renderable UI view model from current state.
    ///
    /// Transforms application state into a structured representation for
    /// rendering. Handles result row formatting, focus flags, the footer
    /// keybinding or status line, and the optional date-picker overlay.
    ///
    /// # Parameters
    ///
    /// * `cols` - Terminal width in character cells, used to truncate result
    ///   summaries
    ///
    /// # Returns
    ///
    /// A [`UIViewModel`] containing
    /// display rows for every panel.
    #[must_use]
    pub fn compute_viewmodel(&self, cols: usize) -> UIViewModel {
        UIViewModel {
            header: self.compute_header(),
            query_bar: QueryBarInfo {
                query: self.query.clone(),
                is_focused: self.focus == Focus::Query && self.date_overlay.is_none(),
            },
            selector: self.compute_selector(),
            form: self.compute_form(),
            results: self.compute_results(cols),
            footer: self.compute_footer(),
            empty_state: self.compute_empty_state(),
            date_picker: self.compute_date_picker(),
        }
    }

    /// Computes the header title including the active program scope.
    fn compute_header(&self) -> HeaderInfo {
        let scope = self
            .scope
            .as_ref()
            .map_or(PROGRAM_PLACEHOLDER, |program| program.name.as_str());
        HeaderInfo {
            title: format!(" Tracked Entity Search ({scope}) "),
        }
    }

    /// Computes selector entries with cursor and selection flags.
    fn compute_selector(&self) -> SelectorViewModel {
        let focused = self.focus == Focus::Programs && self.date_overlay.is_none();
        let entries = (0..self.selector.entry_count())
            .map(|position| SelectorEntry {
                label: self.selector.label_at(position).to_string(),
                is_cursor: focused && position == self.selector.cursor(),
                is_selected: position == self.selector.selected(),
            })
            .collect();

        SelectorViewModel {
            entries,
            collapsed_label: self.selector.label_at(self.selector.selected()).to_string(),
            is_expanded: focused,
            is_focused: focused,
        }
    }

    /// Computes form rows with editing hints per value type.
    fn compute_form(&self) -> FormViewModel {
        let focused = self.focus == Focus::Form && self.date_overlay.is_none();
        let rows = self.form.as_bound().map_or_else(Vec::new, |form| {
            form.items()
                .iter()
                .enumerate()
                .map(|(index, field)| FormRow {
                    label: field.attribute.label.clone(),
                    value: field.value.clone(),
                    detail: Self::field_detail(&field.attribute),
                    is_cursor: focused && index == form.cursor(),
                })
                .collect()
        });

        FormViewModel {
            rows,
            is_focused: focused,
        }
    }

    /// Editing hint for a form row, derived from the attribute kind.
    fn field_detail(attribute: &TrackedEntityAttribute) -> Option<String> {
        if attribute.has_options() {
            return Some(format!("one of: {}", attribute.options.join(", ")));
        }
        match attribute.value_type {
            ValueType::Date => Some("Enter picks a date".to_string()),
            ValueType::Number => Some("digits only".to_string()),
            ValueType::Text => None,
        }
    }

    /// Computes preview rows, the counter label, and the suppression hint.
    fn compute_results(&self, cols: usize) -> ResultsViewModel {
        let focused = self.focus == Focus::Results && self.date_overlay.is_none();
        let scope_attributes: Vec<TrackedEntityAttribute> =
            self.form.as_bound().map_or_else(Vec::new, |form| {
                form.items()
                    .iter()
                    .map(|field| field.attribute.clone())
                    .collect()
            });

        let rows = self.results.as_bound().map_or_else(Vec::new, |results| {
            results
                .items()
                .iter()
                .enumerate()
                .map(|(index, instance)| {
                    self.compute_result_row(
                        instance,
                        &scope_attributes,
                        cols,
                        focused && index == results.cursor(),
                    )
                })
                .collect()
        });

        let hint = match self.counter_label {
            Some(_) if self.total_results == 0 => {
                Some("No matches for the current filters".to_string())
            }
            Some(_) if self.total_results >= INLINE_PREVIEW_MAX => {
                Some("Narrow the search to preview rows".to_string())
            }
            _ => None,
        };

        ResultsViewModel {
            counter_label: self.counter_label.clone(),
            rows,
            hint,
            is_focused: focused,
        }
    }

    /// Formats one preview row from an instance and the scope attributes.
    fn compute_result_row(
        &self,
        instance: &TrackedEntityInstance,
        attributes: &[TrackedEntityAttribute],
        cols: usize,
        is_cursor: bool,
    ) -> ResultRow {
        const ORG_AND_UPDATED_WIDTH: usize = 30;

        let joined = instance
            .display_values(attributes)
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let summary = if joined.is_empty() {
            instance.id.clone()
        } else {
            joined
        };

        let max_summary = cols.saturating_sub(ORG_AND_UPDATED_WIDTH).max(8);
        let summary = if summary.chars().count() > max_summary {
            let kept: String = summary.chars().take(max_summary.saturating_sub(3)).collect();
            format!("{kept}...")
        } else {
            summary
        };

        ResultRow {
            summary,
            org_unit: instance.org_unit.clone(),
            updated: instance.updated_ago(),
            is_cursor,
        }
    }

    /// Computes footer text: overlay keys, then status, then focus keys.
    fn compute_footer(&self) -> FooterInfo {
        if self.date_overlay.is_some() {
            return FooterInfo {
                text: "Left/Right: segment  Up/Down: adjust  Enter: apply  ESC: cancel"
                    .to_string(),
                is_status: false,
            };
        }
        if let Some(status) = &self.status {
            return FooterInfo {
                text: status.clone(),
                is_status: true,
            };
        }

        let keybindings = match self.focus {
            Focus::Form => {
                "Up/Down: field  Enter: date/search  Left/Right: options  Tab: panel  Ctrl+L: clear  ESC: quit"
            }
            Focus::Programs => "Up/Down: move  Enter: apply program  Tab: panel  ESC: form",
            Focus::Results => "Up/Down: row  Tab: panel  ESC: form",
            Focus::Query => "type to filter  Enter: search  Tab: panel  ESC: clear",
        };

        FooterInfo {
            text: keybindings.to_string(),
            is_status: false,
        }
    }

    /// Loading or seeding hint shown before any catalog content arrives.
    fn compute_empty_state(&self) -> Option<EmptyState> {
        if self.has_catalog() {
            None
        } else {
            Some(EmptyState {
                message: "No catalog loaded".to_string(),
                subtitle: "Waiting for programs; run 'teisearch seed' first for demo data"
                    .to_string(),
            })
        }
    }

    /// Formats the overlay date into padded picker segments.
    fn compute_date_picker(&self) -> Option<DatePickerInfo> {
        self.date_overlay.as_ref().map(|overlay| {
            let date = overlay.date();
            DatePickerInfo {
                title: format!(" {} ", overlay.label()),
                year: format!("{:04}", date.year()),
                month: format!("{:02}", date.month()),
                day: format!("{:02}", date.day()),
                focused_segment: overlay.segment(),
            }
        })
    }
}

impl SearchView for AppState {
    fn set_form(&mut self, fields: Vec<AttributeField>, program: Option<&Program>) {
        let _span = tracing::debug_span!(
            "set_form",
            field_count = fields.len(),
            scoped = program.is_some()
        )
        .entered();

        self.scope = program.cloned();
        let form = self.form.ensure_bound(RowList::new);
        let cursor = form.cursor();
        form.bind(fields);
        form.set_cursor(cursor);
    }

    fn set_programs(&mut self, programs: Vec<Program>) {
        let _span =
            tracing::debug_span!("set_programs", program_count = programs.len()).entered();

        let selected_id = self.scope.as_ref().map(|program| program.id.clone());
        self.selector = ProgramSelect::new(programs, selected_id.as_deref());
    }

    fn swap_data(&mut self, results: SearchResults) {
        let total = results.pager.total;
        let _span = tracing::debug_span!(
            "swap_data",
            total,
            page_instances = results.instances.len()
        )
        .entered();

        let list = self.results.ensure_bound(RowList::new);
        list.clear();
        if total > 0 && total < INLINE_PREVIEW_MAX {
            list.append_or_replace(results.instances);
        }
        self.total_results = total;
        self.counter_label = Some(format!("{total} results found"));

        tracing::debug!(preview_rows = self.results.as_bound().map_or(0, RowList::len), "results swapped");
    }

    fn show_date_dialog(&mut self, request: DateDialogRequest) {
        self.date_overlay = Some(DateOverlay::open(request));
    }

    fn show_status(&mut self, message: String) {
        self.status = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Pager;
    use std::sync::mpsc;

    fn state() -> AppState {
        AppState::new(Theme::default())
    }

    fn attribute(id: &str, label: &str) -> TrackedEntityAttribute {
        TrackedEntityAttribute::new(id, label, ValueType::Text)
    }

    fn fields(specs: &[(&str, &str)]) -> Vec<AttributeField> {
        specs
            .iter()
            .map(|(id, label)| AttributeField::new(attribute(id, label)))
            .collect()
    }

    fn instance(id: &str) -> TrackedEntityInstance {
        TrackedEntityInstance::new(id, "Nyamira Clinic")
    }

    fn envelope(total: usize, page_instances: usize) -> SearchResults {
        SearchResults {
            pager: Pager::for_total(1, 50, total),
            instances: (0..page_instances)
                .map(|index| instance(&format!("tei-{index:04}")))
                .collect(),
        }
    }

    fn preview_ids(state: &AppState) -> Vec<String> {
        state.results.as_bound().map_or_else(Vec::new, |results| {
            results.items().iter().map(|i| i.id.clone()).collect()
        })
    }

    #[test]
    fn small_totals_render_exactly_that_many_rows() {
        for total in 1..=3 {
            let mut state = state();
            state.swap_data(envelope(total, total));

            assert_eq!(preview_ids(&state).len(), total);
            assert_eq!(
                state.counter_label.as_deref(),
                Some(format!("{total} results found").as_str())
            );
        }
    }

    #[test]
    fn zero_and_large_totals_render_no_rows_but_keep_the_label() {
        for (total, page_instances) in [(0, 0), (4, 4), (100, 50)] {
            let mut state = state();
            state.swap_data(envelope(total, page_instances));

            assert!(preview_ids(&state).is_empty());
            assert_eq!(
                state.counter_label.as_deref(),
                Some(format!("{total} results found").as_str())
            );
        }
    }

    #[test]
    fn consecutive_swaps_never_accumulate_rows() {
        let mut state = state();

        state.swap_data(SearchResults {
            pager: Pager::for_total(1, 50, 2),
            instances: vec![instance("tei-a"), instance("tei-b")],
        });
        state.swap_data(SearchResults {
            pager: Pager::for_total(1, 50, 3),
            instances: vec![instance("tei-c"), instance("tei-d"), instance("tei-e")],
        });

        assert_eq!(preview_ids(&state), vec!["tei-c", "tei-d", "tei-e"]);
        assert_eq!(state.counter_label.as_deref(), Some("3 results found"));
    }

    #[test]
    fn counter_label_is_absent_before_the_first_swap() {
        let state = state();
        assert!(state.counter_label.is_none());
        assert!(state.compute_viewmodel(80).results.counter_label.is_none());
    }

    #[test]
    fn set_form_reuses_the_binding_and_preserves_the_cursor() {
        let mut state = state();

        state.set_form(fields(&[("a", "First name"), ("b", "Last name")]), None);
        assert!(state.form.is_bound());
        state.move_cursor_down();
        assert_eq!(state.form.as_bound().unwrap().cursor(), 1);

        state.set_form(fields(&[("a", "First name"), ("b", "Last name")]), None);
        let form = state.form.as_bound().unwrap();
        assert_eq!(form.cursor(), 1);
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn set_form_clamps_the_cursor_when_the_scope_shrinks() {
        let mut state = state();

        state.set_form(
            fields(&[("a", "A"), ("b", "B"), ("c", "C")]),
            None,
        );
        state.move_cursor_down();
        state.move_cursor_down();
        assert_eq!(state.form.as_bound().unwrap().cursor(), 2);

        let program = Program::new("p1", "TB Control", vec!["a".to_string()]);
        state.set_form(fields(&[("a", "A")]), Some(&program));

        assert_eq!(state.form.as_bound().unwrap().cursor(), 0);
        assert_eq!(state.scope.as_ref().map(|p| p.id.as_str()), Some("p1"));
    }

    #[test]
    fn set_programs_rebuilds_the_selector_each_time() {
        let mut state = state();

        state.set_programs(vec![
            Program::new("p1", "One", vec![]),
            Program::new("p2", "Two", vec![]),
            Program::new("p3", "Three", vec![]),
        ]);
        assert_eq!(state.selector.entry_count(), 4);

        state.set_programs(vec![Program::new("p1", "One", vec![])]);
        assert_eq!(state.selector.entry_count(), 2);
    }

    #[test]
    fn set_programs_keeps_the_confirmed_scope_selected() {
        let mut state = state();
        let program = Program::new("p2", "Two", vec![]);

        state.set_form(Vec::new(), Some(&program));
        state.set_programs(vec![
            Program::new("p1", "One", vec![]),
            Program::new("p2", "Two", vec![]),
        ]);

        assert_eq!(state.selector.selected(), 2);
        assert_eq!(state.selector.cursor(), 2);
    }

    #[test]
    fn show_date_dialog_opens_an_overlay_whose_confirm_fires_the_listener() {
        let mut state = state();
        let (tx, rx) = mpsc::channel();

        state.show_date_dialog(DateDialogRequest {
            attribute_id: "attr-dob".to_string(),
            label: "Date of birth".to_string(),
            listener: Box::new(move |picked| {
                tx.send(picked).unwrap();
            }),
        });

        let overlay = state.date_overlay.take().unwrap();
        let shown = overlay.date();
        overlay.confirm();

        assert_eq!(rx.try_recv().unwrap(), shown);
    }

    #[test]
    fn clear_filter_values_blanks_fields_and_query() {
        let mut state = state();
        state.set_form(fields(&[("a", "A"), ("b", "B")]), None);
        if let Some(field) = state.focused_field_mut() {
            field.value.push_str("Awino");
        }
        state.query = "okoth".to_string();

        state.clear_filter_values();

        let form = state.form.as_bound().unwrap();
        assert!(form.items().iter().all(AttributeField::is_empty));
        assert!(state.query.is_empty());
    }

    #[test]
    fn viewmodel_reports_scope_and_empty_state() {
        let mut state = state();
        assert!(state.compute_viewmodel(80).empty_state.is_some());

        let program = Program::new("p1", "TB Control", vec!["a".to_string()]);
        state.set_form(fields(&[("a", "A")]), Some(&program));
        state.set_programs(vec![program]);

        let vm = state.compute_viewmodel(80);
        assert!(vm.empty_state.is_none());
        assert!(vm.header.title.contains("TB Control"));
        assert_eq!(vm.selector.entries.len(), 2);
    }

    #[test]
    fn viewmodel_hints_when_the_preview_is_suppressed() {
        let mut state = state();

        state.swap_data(envelope(12, 12));
        let vm = state.compute_viewmodel(80);
        assert_eq!(vm.results.counter_label.as_deref(), Some("12 results found"));
        assert!(vm.results.rows.is_empty());
        assert!(vm.results.hint.is_some());

        state.swap_data(envelope(2, 2));
        let vm = state.compute_viewmodel(80);
        assert_eq!(vm.results.rows.len(), 2);
        assert!(vm.results.hint.is_none());
    }

    #[test]
    fn viewmodel_truncates_long_result_summaries() {
        let mut state = state();
        state.set_form(fields(&[("a", "First name")]), None);

        let mut long = instance("tei-long");
        long.values.insert(
            "a".to_string(),
            "An Extremely Long Name That Cannot Possibly Fit".to_string(),
        );
        state.swap_data(SearchResults {
            pager: Pager::for_total(1, 50, 1),
            instances: vec![long],
        });

        let vm = state.compute_viewmodel(40);
        assert!(vm.results.rows[0].summary.ends_with("..."));
    }

    #[test]
    fn footer_prefers_overlay_keys_then_status_then_focus_keys() {
        let mut state = state();
        assert!(!state.compute_viewmodel(80).footer.is_status);

        state.show_status("search failed: disk on fire".to_string());
        let vm = state.compute_viewmodel(80);
        assert!(vm.footer.is_status);
        assert!(vm.footer.text.contains("disk on fire"));

        state.show_date_dialog(DateDialogRequest {
            attribute_id: "attr".to_string(),
            label: "When".to_string(),
            listener: Box::new(|_| {}),
        });
        let vm = state.compute_viewmodel(80);
        assert!(!vm.footer.is_status);
        assert!(vm.footer.text.contains("segment"));
        assert!(vm.date_picker.is_some());
    }
}
