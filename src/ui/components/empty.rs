//! Empty state component renderer.
//!
//! This module renders the empty state message displayed before any attribute
//! catalog has been loaded.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders the empty state message into the given area.
///
/// Displays a centered two-line message across the space the form and result
/// panels would otherwise occupy. Shown when:
/// - The store has never been seeded
/// - The catalog load has not completed yet
///
/// # Parameters
///
/// * `frame` - Frame to render into
/// * `area` - Area spanning the form and result panels
/// * `empty` - Empty state information (message and subtitle)
/// * `theme` - Active color theme
///
/// # Layout
///
/// ```text
/// [vertical padding]
/// [left padding] MESSAGE [right padding]
/// [left padding] subtitle [right padding]
/// [vertical padding]
/// ```
///
/// Both lines are horizontally centered. The message uses the
/// `empty_state_fg` theme color, and the subtitle uses `text_dim` with dim
/// styling.
pub fn render_empty_state(frame: &mut Frame, area: Rect, empty: &EmptyState, theme: &Theme) {
    let [_, message_row, subtitle_row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(2),
    ])
    .areas(area);

    let message = Paragraph::new(empty.message.clone())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Theme::color(&theme.colors.empty_state_fg)));
    frame.render_widget(message, message_row);

    let subtitle = Paragraph::new(empty.subtitle.clone())
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Theme::color(&theme.colors.text_dim))
                .add_modifier(Modifier::DIM),
        );
    frame.render_widget(subtitle, subtitle_row);
}
