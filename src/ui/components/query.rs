//! Query bar component renderer.
//!
//! This module renders the free-text query input box with a bordered frame
//! and a block cursor while the bar has keyboard focus.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::ui::theme::Theme;
use crate::ui::viewmodel::QueryBarInfo;

/// Renders the query input box into the given area.
///
/// Displays a 3-line bordered box containing the query text. The border
/// switches to the focus color while the bar is active, and a block cursor
/// marks the insertion point.
///
/// # Parameters
///
/// * `frame` - Frame to render into
/// * `area` - Three-row area reserved for the query box
/// * `query` - Query bar information (text and focus flag)
/// * `theme` - Active color theme
///
/// # Layout
///
/// ```text
/// ┌ Search ─────────────┐
/// │ ana█                │
/// └─────────────────────┘
/// ```
pub fn render_query_bar(frame: &mut Frame, area: Rect, query: &QueryBarInfo, theme: &Theme) {
    let border_color = if query.is_focused {
        Theme::color(&theme.colors.focus_border)
    } else {
        Theme::color(&theme.colors.border)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Search ");

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            query.query.clone(),
            Style::default().fg(Theme::color(&theme.colors.text_normal)),
        ),
    ];
    if query.is_focused {
        spans.push(Span::styled(
            "\u{2588}",
            Style::default().fg(Theme::color(&theme.colors.accent)),
        ));
    }

    let text = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(text, area);
}
