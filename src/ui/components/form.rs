//! Attribute form component renderer.
//!
//! This module renders the dynamic attribute form as labelled rows with
//! aligned values, cursor highlighting, and placeholder hints for fields
//! that are edited through pickers.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FormRow, FormViewModel};

/// Marker shown in front of the row under the movement cursor.
const CURSOR_MARK: &str = "\u{25b6} ";

/// Renders the attribute form into the given area.
///
/// Each catalog attribute occupies one row with its label left-aligned into
/// a shared column and the entered value after it. Empty fields show their
/// editing hint dimmed in place of the value. The cursor row carries a `▶`
/// marker and the selection colors; rows beyond the panel height scroll so
/// the cursor stays visible.
///
/// # Parameters
///
/// * `frame` - Frame to render into
/// * `area` - Area reserved for the form panel
/// * `form` - Form panel state
/// * `theme` - Active color theme
///
/// # Layout
///
/// ```text
/// ┌ Attributes ────────────────────┐
/// │ ▶ First name   Ana█            │
/// │   Gender       one of: Female… │
/// │   Date of birth 2024-01-05     │
/// └────────────────────────────────┘
/// ```
pub fn render_form(frame: &mut Frame, area: Rect, form: &FormViewModel, theme: &Theme) {
    let border_color = if form.is_focused {
        Theme::color(&theme.colors.focus_border)
    } else {
        Theme::color(&theme.colors.border)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Attributes ");

    let label_width = form
        .rows
        .iter()
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = form
        .rows
        .iter()
        .map(|row| form_line(row, label_width, form.is_focused, theme))
        .collect();

    let inner_height = area.height.saturating_sub(2) as usize;
    let cursor_index = form.rows.iter().position(|row| row.is_cursor).unwrap_or(0);
    let scroll = cursor_index.saturating_sub(inner_height.saturating_sub(1)) as u16;

    let panel = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(panel, area);
}

fn form_line<'a>(row: &FormRow, label_width: usize, focused: bool, theme: &Theme) -> Line<'a> {
    let marker = if row.is_cursor {
        Span::styled(
            CURSOR_MARK,
            Style::default().fg(Theme::color(&theme.colors.accent)),
        )
    } else {
        Span::raw("  ")
    };

    let label_style = if row.is_cursor {
        Style::default()
            .fg(Theme::color(&theme.colors.selection_fg))
            .bg(Theme::color(&theme.colors.selection_bg))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::color(&theme.colors.text_normal))
    };

    let mut spans = vec![
        Span::raw(" "),
        marker,
        Span::styled(format!("{:<label_width$}", row.label), label_style),
        Span::raw("  "),
    ];

    if row.value.is_empty() {
        if let Some(detail) = &row.detail {
            spans.push(Span::styled(
                detail.clone(),
                Style::default()
                    .fg(Theme::color(&theme.colors.text_dim))
                    .add_modifier(Modifier::ITALIC),
            ));
        }
    } else {
        spans.push(Span::styled(
            row.value.clone(),
            Style::default().fg(Theme::color(&theme.colors.text_normal)),
        ));
        if row.is_cursor && focused {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().fg(Theme::color(&theme.colors.accent)),
            ));
        }
    }

    Line::from(spans)
}
