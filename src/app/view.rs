//! View contract between the search presenter and the rendering layer.
//!
//! This module defines [`SearchView`], the push interface the presenter drives,
//! together with the small building blocks the concrete view is made of:
//! [`Binding`] for lazily created list state, [`RenderableList`] for row
//! lifecycle, [`RowList`] as the concrete list used by the form and the result
//! preview, [`ProgramSelect`] for the program selector, and [`DateOverlay`] for
//! the modal date picker.
//!
//! # Push Flow
//!
//! The presenter never reads widget state back. It pushes complete models:
//!
//! ```text
//! set_form(fields, program)   replace the attribute form for a scope
//! set_programs(programs)      rebuild the program selector entries
//! swap_data(results)          replace the result preview and counter label
//! show_date_dialog(request)   open the modal date picker
//! show_status(message)        surface a one-line status or error
//! ```
//!
//! # Inline Preview
//!
//! Result rows are rendered inline only for small result sets. The counter
//! label always reflects the full total, so a suppressed preview still tells
//! the user how many matches exist.

use std::fmt;

use chrono::{Datelike, Local, Months, NaiveDate};

use crate::domain::{AttributeField, Program, SearchResults};

/// Largest result total that still renders inline preview rows.
///
/// Totals of this size or above keep the preview empty while the counter
/// label continues to report the full count.
pub const INLINE_PREVIEW_MAX: usize = 4;

/// Placeholder entry shown at the top of the program selector.
pub const PROGRAM_PLACEHOLDER: &str = "All programs";

/// Callback invoked with the date the user confirms in the picker.
pub type DateListener = Box<dyn FnOnce(NaiveDate) + Send>;

/// Rendering surface the presenter pushes into.
///
/// The terminal screen implements this for real rendering; tests substitute a
/// recording double. Every method replaces state wholesale, so repeated calls
/// never accumulate rows or entries.
pub trait SearchView {
    /// Replaces the attribute form with fields scoped to `program`.
    ///
    /// `None` means the unscoped form covering the full attribute catalog.
    /// The form list is created on first use and reused afterwards.
    fn set_form(&mut self, fields: Vec<AttributeField>, program: Option<&Program>);

    /// Rebuilds the program selector from `programs`.
    ///
    /// The selector always gains a placeholder entry at position zero, so a
    /// catalog of `n` programs produces `n + 1` selectable entries.
    fn set_programs(&mut self, programs: Vec<Program>);

    /// Replaces the result preview with a fresh result envelope.
    ///
    /// Clears any previously shown rows, updates the counter label from the
    /// envelope total, and renders inline rows only when the total is between
    /// one and [`INLINE_PREVIEW_MAX`] exclusive.
    fn swap_data(&mut self, results: SearchResults);

    /// Opens the modal date picker described by `request`.
    ///
    /// While the picker is open it owns all input. Confirming invokes the
    /// request listener with the chosen date; cancelling drops it unheard.
    fn show_date_dialog(&mut self, request: DateDialogRequest);

    /// Surfaces a one-line status message, typically a failure summary.
    fn show_status(&mut self, message: String);
}

/// Row lifecycle operations shared by bindable list state.
///
/// Hides whether a list has been populated before: callers clear and refill
/// without tracking adapter state themselves.
pub trait RenderableList<T> {
    /// Establishes the backing items, resetting the cursor to the top.
    fn bind(&mut self, items: Vec<T>);

    /// Removes all items and resets the cursor.
    fn clear(&mut self);

    /// Appends to a populated list, or establishes the items when empty.
    fn append_or_replace(&mut self, items: Vec<T>);
}

/// Lazily created list state.
///
/// The form and result lists exist only after the presenter first pushes
/// content. [`Binding::ensure_bound`] creates the list once and returns the
/// same instance on every later call, so repeated pushes reuse one binding.
///
/// # Example
///
/// ```rust
/// use teisearch::app::{Binding, RowList};
///
/// let mut binding: Binding<RowList<String>> = Binding::Uninitialized;
/// assert!(!binding.is_bound());
///
/// binding.ensure_bound(RowList::default);
/// assert!(binding.is_bound());
/// ```
#[derive(Debug)]
pub enum Binding<L> {
    /// No list has been created yet.
    Uninitialized,
    /// The list exists and can be refilled in place.
    Bound(L),
}

impl<L> Binding<L> {
    /// Returns the bound list, creating it with `make` on first use.
    ///
    /// Calling this on an already bound value ignores `make` and returns the
    /// existing list.
    pub fn ensure_bound<F>(&mut self, make: F) -> &mut L
    where
        F: FnOnce() -> L,
    {
        if let Self::Uninitialized = self {
            *self = Self::Bound(make());
        }
        match self {
            Self::Bound(list) => list,
            Self::Uninitialized => unreachable!("just bound"),
        }
    }

    /// Returns the bound list, or `None` before the first push.
    pub fn as_bound(&self) -> Option<&L> {
        match self {
            Self::Bound(list) => Some(list),
            Self::Uninitialized => None,
        }
    }

    /// Mutable access to the bound list, or `None` before the first push.
    pub fn as_bound_mut(&mut self) -> Option<&mut L> {
        match self {
            Self::Bound(list) => Some(list),
            Self::Uninitialized => None,
        }
    }

    /// Whether the list has been created.
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}

impl<L> Default for Binding<L> {
    fn default() -> Self {
        Self::Uninitialized
    }
}

/// Concrete list state with a wrapping movement cursor.
///
/// Backs both the attribute form and the result preview. The cursor wraps at
/// the ends, matching list navigation elsewhere in the interface.
#[derive(Debug, Clone, Default)]
pub struct RowList<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> RowList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
        }
    }

    /// The backing items in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Mutable access to the backing items.
    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Mutable access to the item under the cursor.
    pub fn selected_mut(&mut self) -> Option<&mut T> {
        self.items.get_mut(self.cursor)
    }

    /// The item under the cursor.
    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor to `position`, clamped into the current items.
    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = if self.items.is_empty() {
            0
        } else {
            position.min(self.items.len() - 1)
        };
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Moves the cursor one row down, wrapping at the bottom.
    pub fn move_down(&mut self) {
        if !self.items.is_empty() {
            self.cursor = (self.cursor + 1) % self.items.len();
        }
    }

    /// Moves the cursor one row up, wrapping at the top.
    pub fn move_up(&mut self) {
        if !self.items.is_empty() {
            self.cursor = self
                .cursor
                .checked_sub(1)
                .unwrap_or(self.items.len() - 1);
        }
    }
}

impl<T> RenderableList<T> for RowList<T> {
    fn bind(&mut self, items: Vec<T>) {
        self.items = items;
        self.cursor = 0;
    }

    fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }

    fn append_or_replace(&mut self, items: Vec<T>) {
        if self.items.is_empty() {
            self.bind(items);
        } else {
            self.items.extend(items);
        }
    }
}

/// Program selector state with a fixed placeholder at position zero.
///
/// Position `k > 0` maps to `programs[k - 1]`; position zero is the
/// placeholder and maps to no program at all. Selection is therefore an
/// `Option<Program>` rather than an index into the catalog.
#[derive(Debug, Clone, Default)]
pub struct ProgramSelect {
    programs: Vec<Program>,
    cursor: usize,
    selected: usize,
}

impl ProgramSelect {
    /// Builds selector entries, positioning the cursor on `selected_id` when
    /// that program is present and on the placeholder otherwise.
    pub fn new(programs: Vec<Program>, selected_id: Option<&str>) -> Self {
        let selected = selected_id
            .and_then(|id| programs.iter().position(|program| program.id == id))
            .map_or(0, |index| index + 1);
        Self {
            programs,
            cursor: selected,
            selected,
        }
    }

    /// Total selectable entries, including the placeholder.
    pub fn entry_count(&self) -> usize {
        self.programs.len() + 1
    }

    /// The programs behind the selector, placeholder excluded.
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Current cursor position over the entries.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Position of the last confirmed selection.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The program a position maps to, or `None` for the placeholder.
    pub fn selection_at(&self, position: usize) -> Option<&Program> {
        position
            .checked_sub(1)
            .and_then(|index| self.programs.get(index))
    }

    /// Display label for a position.
    pub fn label_at(&self, position: usize) -> &str {
        self.selection_at(position)
            .map_or(PROGRAM_PLACEHOLDER, |program| program.name.as_str())
    }

    /// Moves the cursor one entry down, wrapping past the last program.
    pub fn move_down(&mut self) {
        self.cursor = (self.cursor + 1) % self.entry_count();
    }

    /// Moves the cursor one entry up, wrapping onto the last program.
    pub fn move_up(&mut self) {
        self.cursor = self
            .cursor
            .checked_sub(1)
            .unwrap_or(self.entry_count() - 1);
    }

    /// Confirms the entry under the cursor and returns its program.
    ///
    /// Returns `None` when the placeholder is confirmed, which callers treat
    /// as clearing the program scope.
    pub fn confirm(&mut self) -> Option<Program> {
        self.selected = self.cursor;
        self.selection_at(self.cursor).cloned()
    }
}

/// Request to open the modal date picker.
pub struct DateDialogRequest {
    /// Attribute the picked date will be written into.
    pub attribute_id: String,
    /// Field label shown in the picker title.
    pub label: String,
    /// Invoked with the confirmed date; dropped unheard on cancel.
    pub listener: DateListener,
}

impl fmt::Debug for DateDialogRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateDialogRequest")
            .field("attribute_id", &self.attribute_id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Segment of the date currently being adjusted in the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSegment {
    Year,
    Month,
    Day,
}

impl DateSegment {
    /// The segment to the right, stopping at the day.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Year => Self::Month,
            Self::Month | Self::Day => Self::Day,
        }
    }

    /// The segment to the left, stopping at the year.
    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            Self::Day => Self::Month,
            Self::Month | Self::Year => Self::Year,
        }
    }
}

/// Modal date picker state.
///
/// Opens seeded with the current local date and adjusts one segment at a
/// time. Day adjustments step through the calendar, month adjustments clamp
/// the day into the target month, and year adjustments clamp the 29th of
/// February into non-leap years.
pub struct DateOverlay {
    attribute_id: String,
    label: String,
    date: NaiveDate,
    segment: DateSegment,
    listener: Option<DateListener>,
}

impl DateOverlay {
    /// Opens the picker seeded with today's local date.
    pub fn open(request: DateDialogRequest) -> Self {
        Self::open_on(request, Local::now().date_naive())
    }

    /// Opens the picker seeded with a specific date.
    pub fn open_on(request: DateDialogRequest, date: NaiveDate) -> Self {
        Self {
            attribute_id: request.attribute_id,
            label: request.label,
            date,
            segment: DateSegment::Day,
            listener: Some(request.listener),
        }
    }

    /// Attribute the picker is editing.
    pub fn attribute_id(&self) -> &str {
        &self.attribute_id
    }

    /// Field label for the picker title.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The date currently shown.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The segment currently being adjusted.
    pub fn segment(&self) -> DateSegment {
        self.segment
    }

    /// Moves segment focus one step to the right.
    pub fn focus_next_segment(&mut self) {
        self.segment = self.segment.next();
    }

    /// Moves segment focus one step to the left.
    pub fn focus_prev_segment(&mut self) {
        self.segment = self.segment.prev();
    }

    /// Adjusts the focused segment by `delta` steps.
    ///
    /// Leaves the date unchanged when the adjustment falls outside the
    /// calendar range chrono supports.
    pub fn bump(&mut self, delta: i32) {
        let date = self.date;
        self.date = match self.segment {
            DateSegment::Day => Self::bump_days(date, delta),
            DateSegment::Month => Self::bump_months(date, delta),
            DateSegment::Year => Self::bump_years(date, delta),
        };
    }

    /// Consumes the overlay and invokes the listener with the shown date.
    pub fn confirm(self) {
        if let Some(listener) = self.listener {
            listener(self.date);
        }
    }

    fn bump_days(date: NaiveDate, delta: i32) -> NaiveDate {
        let mut current = date;
        for _ in 0..delta.unsigned_abs() {
            let next = if delta >= 0 {
                current.succ_opt()
            } else {
                current.pred_opt()
            };
            match next {
                Some(next) => current = next,
                None => return date,
            }
        }
        current
    }

    fn bump_months(date: NaiveDate, delta: i32) -> NaiveDate {
        let months = Months::new(delta.unsigned_abs());
        let next = if delta >= 0 {
            date.checked_add_months(months)
        } else {
            date.checked_sub_months(months)
        };
        next.unwrap_or(date)
    }

    fn bump_years(date: NaiveDate, delta: i32) -> NaiveDate {
        let year = date.year().saturating_add(delta);
        let day = date.day().min(days_in_month(year, date.month()));
        NaiveDate::from_ymd_opt(year, date.month(), day).unwrap_or(date)
    }
}

impl fmt::Debug for DateOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateOverlay")
            .field("attribute_id", &self.attribute_id)
            .field("label", &self.label)
            .field("date", &self.date)
            .field("segment", &self.segment)
            .finish_non_exhaustive()
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}


#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    fn program(id: &str, name: &str) -> Program {
        Program::new(id, name, Vec::new())
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn ensure_bound_creates_once_and_reuses() {
        let mut binding: Binding<RowList<u32>> = Binding::Uninitialized;
        let mut created = 0;

        binding.ensure_bound(|| {
            created += 1;
            RowList::new()
        });
        binding
            .ensure_bound(|| {
                created += 1;
                RowList::new()
            })
            .bind(vec![1, 2, 3]);

        assert_eq!(created, 1);
        assert!(binding.is_bound());
        assert_eq!(binding.as_bound().unwrap().len(), 3);
    }

    #[test]
    fn row_list_append_or_replace_establishes_then_extends() {
        let mut list = RowList::new();

        list.append_or_replace(vec!["a", "b"]);
        assert_eq!(list.items(), &["a", "b"]);

        list.append_or_replace(vec!["c"]);
        assert_eq!(list.items(), &["a", "b", "c"]);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn row_list_cursor_wraps_both_directions() {
        let mut list = RowList::new();
        list.bind(vec![10, 20, 30]);

        list.move_up();
        assert_eq!(list.cursor(), 2);
        list.move_down();
        assert_eq!(list.cursor(), 0);
        list.move_down();
        assert_eq!(list.selected(), Some(&20));
    }

    #[test]
    fn selector_maps_placeholder_to_no_program() {
        let mut select = ProgramSelect::new(
            vec![program("p1", "Maternal and Child Health"), program("p2", "TB Control")],
            None,
        );

        assert_eq!(select.entry_count(), 3);
        assert_eq!(select.label_at(0), PROGRAM_PLACEHOLDER);
        assert!(select.selection_at(0).is_none());
        assert_eq!(select.selection_at(2).map(|p| p.id.as_str()), Some("p2"));

        assert!(select.confirm().is_none());
        select.move_down();
        let confirmed = select.confirm();
        assert_eq!(confirmed.map(|p| p.id), Some("p1".to_string()));
        assert_eq!(select.selected(), 1);
    }

    #[test]
    fn selector_positions_cursor_on_known_selection() {
        let select = ProgramSelect::new(
            vec![program("p1", "One"), program("p2", "Two")],
            Some("p2"),
        );
        assert_eq!(select.cursor(), 2);

        let select = ProgramSelect::new(vec![program("p1", "One")], Some("gone"));
        assert_eq!(select.cursor(), 0);
    }

    #[test]
    fn selector_cursor_wraps_over_placeholder() {
        let mut select = ProgramSelect::new(vec![program("p1", "One")], None);

        select.move_up();
        assert_eq!(select.cursor(), 1);
        select.move_down();
        assert_eq!(select.cursor(), 0);
    }

    #[test]
    fn overlay_confirm_invokes_listener_with_shown_date() {
        let (tx, rx) = mpsc::channel();
        let request = DateDialogRequest {
            attribute_id: "attr-dob".to_string(),
            label: "Date of birth".to_string(),
            listener: Box::new(move |picked| {
                tx.send(picked).unwrap();
            }),
        };

        let mut overlay = DateOverlay::open_on(request, date(2024, 3, 15));
        overlay.bump(-1);
        overlay.confirm();

        assert_eq!(rx.try_recv().unwrap(), date(2024, 3, 14));
    }

    #[test]
    fn overlay_opens_on_current_local_date() {
        let before = Local::now().date_naive();
        let overlay = DateOverlay::open(DateDialogRequest {
            attribute_id: "attr".to_string(),
            label: "When".to_string(),
            listener: Box::new(|_| {}),
        });
        let after = Local::now().date_naive();

        assert!(overlay.date() == before || overlay.date() == after);
        assert_eq!(overlay.segment(), DateSegment::Day);
    }

    #[test]
    fn overlay_month_bump_clamps_day_into_target_month() {
        let request = DateDialogRequest {
            attribute_id: "attr".to_string(),
            label: "When".to_string(),
            listener: Box::new(|_| {}),
        };
        let mut overlay = DateOverlay::open_on(request, date(2024, 1, 31));

        overlay.focus_prev_segment();
        assert_eq!(overlay.segment(), DateSegment::Month);
        overlay.bump(1);
        assert_eq!(overlay.date(), date(2024, 2, 29));
    }

    #[test]
    fn overlay_year_bump_clamps_leap_day() {
        let request = DateDialogRequest {
            attribute_id: "attr".to_string(),
            label: "When".to_string(),
            listener: Box::new(|_| {}),
        };
        let mut overlay = DateOverlay::open_on(request, date(2024, 2, 29));

        overlay.focus_prev_segment();
        overlay.focus_prev_segment();
        assert_eq!(overlay.segment(), DateSegment::Year);
        overlay.bump(1);
        assert_eq!(overlay.date(), date(2025, 2, 28));
    }

    #[test]
    fn overlay_day_bump_crosses_month_boundary() {
        let request = DateDialogRequest {
            attribute_id: "attr".to_string(),
            label: "When".to_string(),
            listener: Box::new(|_| {}),
        };
        let mut overlay = DateOverlay::open_on(request, date(2024, 2, 29));

        overlay.bump(1);
        assert_eq!(overlay.date(), date(2024, 3, 1));
        overlay.bump(-2);
        assert_eq!(overlay.date(), date(2024, 2, 28));
    }
}
