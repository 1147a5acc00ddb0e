//! Result preview component renderer.
//!
//! This module renders the search result panel: the result counter, the
//! inline preview table for small result sets, and the hint shown when the
//! preview is suppressed.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::ui::theme::Theme;
use crate::ui::viewmodel::{ResultRow, ResultsViewModel};

/// Column spacing inside the preview table.
const RESULT_COLUMN_SPACING: u16 = 2;

/// Renders the result panel into the given area.
///
/// The counter line appears first and survives every search; the preview
/// table below it is only populated for small result sets. When the preview
/// is empty, an explanatory hint is centered in its place.
///
/// # Parameters
///
/// * `frame` - Frame to render into
/// * `area` - Area reserved for the result panel
/// * `results` - Result panel state
/// * `theme` - Active color theme
///
/// # Layout
///
/// ```text
/// ┌ Results ──────────────────────────────┐
/// │ 3 results found                       │
/// │ SUMMARY            ORG UNIT   UPDATED │
/// │ Ana Perez, Female  Ngelehun   3h ago  │
/// └───────────────────────────────────────┘
/// ```
pub fn render_results(frame: &mut Frame, area: Rect, results: &ResultsViewModel, theme: &Theme) {
    let border_color = if results.is_focused {
        Theme::color(&theme.colors.focus_border)
    } else {
        Theme::color(&theme.colors.border)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Results ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let body = if let Some(counter) = &results.counter_label {
        let [counter_row, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

        let counter_line = Paragraph::new(format!(" {counter}")).style(
            Style::default()
                .fg(Theme::color(&theme.colors.accent))
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(counter_line, counter_row);
        body
    } else {
        inner
    };

    if results.rows.is_empty() {
        if let Some(hint) = &results.hint {
            render_hint(frame, body, hint, theme);
        }
        return;
    }

    render_preview_table(frame, body, &results.rows, theme);
}

/// Renders the inline preview rows as a three-column table.
fn render_preview_table(frame: &mut Frame, area: Rect, rows: &[ResultRow], theme: &Theme) {
    let header_style = Style::default()
        .fg(Theme::color(&theme.colors.text_dim))
        .add_modifier(Modifier::BOLD);
    let header = Row::new(vec![" SUMMARY", "ORG UNIT", "UPDATED"]).style(header_style);

    let table_rows: Vec<Row> = rows.iter().map(|row| preview_row(row, theme)).collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Length(10),
    ];
    let table = Table::new(table_rows, widths)
        .header(header)
        .column_spacing(RESULT_COLUMN_SPACING);
    frame.render_widget(table, area);
}

fn preview_row<'a>(row: &ResultRow, theme: &Theme) -> Row<'a> {
    let style = if row.is_cursor {
        Style::default()
            .fg(Theme::color(&theme.colors.selection_fg))
            .bg(Theme::color(&theme.colors.selection_bg))
    } else {
        Style::default().fg(Theme::color(&theme.colors.text_normal))
    };

    let updated_style = if row.is_cursor {
        style
    } else {
        Style::default().fg(Theme::color(&theme.colors.text_dim))
    };

    Row::new(vec![
        Cell::from(format!(" {}", row.summary)).style(style),
        Cell::from(row.org_unit.clone()).style(style),
        Cell::from(row.updated.clone()).style(updated_style),
    ])
}

/// Centers the suppression hint vertically in the preview area.
fn render_hint(frame: &mut Frame, area: Rect, hint: &str, theme: &Theme) {
    let [_, hint_row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    let line = Paragraph::new(hint.to_string())
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Theme::color(&theme.colors.text_dim))
                .add_modifier(Modifier::ITALIC),
        );
    frame.render_widget(line, hint_row);
}
