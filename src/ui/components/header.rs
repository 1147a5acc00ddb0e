//! Header component renderer.
//!
//! This module renders the screen title bar with centered text, theme-aware
//! colors, and optional background styling.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header title bar into the given area.
///
/// Displays the title centered horizontally with bold styling and theme
/// colors. The style fills the entire row, so a configured background color
/// forms a solid bar.
///
/// # Parameters
///
/// * `frame` - Frame to render into
/// * `area` - Single-row area reserved for the header
/// * `header` - Header information (title text)
/// * `theme` - Active color theme
///
/// # Layout
///
/// ```text
/// [left padding] TITLE [right padding]
/// ```
pub fn render_header(frame: &mut Frame, area: Rect, header: &HeaderInfo, theme: &Theme) {
    let mut style = Style::default()
        .fg(Theme::color(&theme.colors.header_fg))
        .add_modifier(Modifier::BOLD);
    if let Some(bg) = &theme.colors.header_bg {
        style = style.bg(Theme::color(bg));
    }

    let title = Paragraph::new(header.title.clone())
        .alignment(Alignment::Center)
        .style(style);
    frame.render_widget(title, area);
}
