//! Modal date picker component renderer.
//!
//! This module renders the date picker dialog centered above the rest of the
//! screen, with the focused segment highlighted and a key hint line.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::DateSegment;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DatePickerInfo;

/// Minimum modal width so the hint line never wraps.
const PICKER_MIN_WIDTH: u16 = 44;

/// Modal height including borders.
const PICKER_HEIGHT: u16 = 5;

/// Renders the modal date picker centered on the frame.
///
/// The area behind the dialog is cleared so the form does not bleed
/// through. Segments are shown as `YYYY - MM - DD` with the focused segment
/// carrying the selection colors.
///
/// # Parameters
///
/// * `frame` - Frame to render into
/// * `picker` - Date picker state
/// * `theme` - Active color theme
///
/// # Layout
///
/// ```text
/// ┌ Date of birth ────────────────────────────┐
/// │               2024 - 01 - 05              │
/// │  ←/→ field  ↑/↓ adjust  Enter: pick  ESC  │
/// └───────────────────────────────────────────┘
/// ```
pub fn render_date_picker(frame: &mut Frame, picker: &DatePickerInfo, theme: &Theme) {
    let width = PICKER_MIN_WIDTH.max(picker.title.chars().count() as u16 + 4);
    let area = centered_rect(frame.area(), width, PICKER_HEIGHT);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::color(&theme.colors.focus_border)))
        .title(format!(" {} ", picker.title));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [segment_row, _, hint_row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let segments = Paragraph::new(segment_line(picker, theme)).alignment(Alignment::Center);
    frame.render_widget(segments, segment_row);

    let hint = Paragraph::new("\u{2190}/\u{2192} field  \u{2191}/\u{2193} adjust  Enter: pick  ESC: cancel")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Theme::color(&theme.colors.text_dim)));
    frame.render_widget(hint, hint_row);
}

fn segment_line<'a>(picker: &DatePickerInfo, theme: &Theme) -> Line<'a> {
    let separator = Span::styled(
        " - ",
        Style::default().fg(Theme::color(&theme.colors.text_dim)),
    );

    Line::from(vec![
        segment_span(&picker.year, picker.focused_segment == DateSegment::Year, theme),
        separator.clone(),
        segment_span(&picker.month, picker.focused_segment == DateSegment::Month, theme),
        separator,
        segment_span(&picker.day, picker.focused_segment == DateSegment::Day, theme),
    ])
}

fn segment_span<'a>(value: &str, focused: bool, theme: &Theme) -> Span<'a> {
    let style = if focused {
        Style::default()
            .fg(Theme::color(&theme.colors.selection_fg))
            .bg(Theme::color(&theme.colors.selection_bg))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::color(&theme.colors.text_normal))
    };
    Span::styled(value.to_string(), style)
}

/// Returns a `width` x `height` rectangle centered inside `area`, clamped to
/// its bounds.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
