//! Program selector component renderer.
//!
//! This module renders the program scope selector, collapsed to a single
//! line when unfocused and expanded to the full entry list while the user is
//! choosing a program.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::ui::theme::Theme;
use crate::ui::viewmodel::{SelectorEntry, SelectorViewModel};

/// Marker shown in front of the confirmed selection.
const SELECTED_MARK: &str = "\u{25cf} ";

/// Renders the program selector into the given area.
///
/// Collapsed, the selector shows the confirmed scope on a single bordered
/// line with a `▾` affordance. Expanded, it lists every entry with the
/// placeholder first; the movement cursor is drawn with the selection
/// colors and the confirmed entry carries a `●` marker.
///
/// # Parameters
///
/// * `frame` - Frame to render into
/// * `area` - Area reserved for the selector (3 rows collapsed, entries + 2
///   expanded)
/// * `selector` - Selector panel state
/// * `theme` - Active color theme
///
/// # Layout
///
/// ```text
/// ┌ Program ────────────┐      ┌ Program ────────────┐
/// │ Child Programme   ▾ │      │   All programs      │
/// └─────────────────────┘      │ ● Child Programme   │
///                              │   Adult Programme   │
///                              └─────────────────────┘
/// ```
pub fn render_selector(frame: &mut Frame, area: Rect, selector: &SelectorViewModel, theme: &Theme) {
    let border_color = if selector.is_focused {
        Theme::color(&theme.colors.focus_border)
    } else {
        Theme::color(&theme.colors.border)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Program ");

    if selector.is_expanded {
        let lines: Vec<Line> = selector
            .entries
            .iter()
            .map(|entry| entry_line(entry, theme))
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);
    } else {
        let inner_width = area.width.saturating_sub(2) as usize;
        let label_width = selector.collapsed_label.chars().count();
        let gap = inner_width.saturating_sub(label_width + 3);
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                selector.collapsed_label.clone(),
                Style::default().fg(Theme::color(&theme.colors.text_normal)),
            ),
            Span::raw(" ".repeat(gap)),
            Span::styled(
                "\u{25be}",
                Style::default().fg(Theme::color(&theme.colors.text_dim)),
            ),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

fn entry_line<'a>(entry: &SelectorEntry, theme: &Theme) -> Line<'a> {
    let marker = if entry.is_selected {
        Span::styled(
            SELECTED_MARK,
            Style::default().fg(Theme::color(&theme.colors.accent)),
        )
    } else {
        Span::raw("  ")
    };

    let label_style = if entry.is_cursor {
        Style::default()
            .fg(Theme::color(&theme.colors.selection_fg))
            .bg(Theme::color(&theme.colors.selection_bg))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::color(&theme.colors.text_normal))
    };

    Line::from(vec![
        Span::raw(" "),
        marker,
        Span::styled(entry.label.clone(), label_style),
    ])
}
