//! Footer component renderer.
//!
//! This module renders the footer bar, which carries either centered
//! keybinding hints or a transient status message.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer bar into the given area.
///
/// Keybinding hints are centered and dimmed; status messages use the theme's
/// status color so failures stand out from the help text they replace.
///
/// # Parameters
///
/// * `frame` - Frame to render into
/// * `area` - Single-row area reserved for the footer
/// * `footer` - Footer information (text and status flag)
/// * `theme` - Active color theme
///
/// # Layout
///
/// ```text
/// [left padding] Tab: panel | Enter: search | ESC: quit [right padding]
/// ```
pub fn render_footer(frame: &mut Frame, area: Rect, footer: &FooterInfo, theme: &Theme) {
    let color = if footer.is_status {
        Theme::color(&theme.colors.status_fg)
    } else {
        Theme::color(&theme.colors.text_dim)
    };

    let line = Paragraph::new(footer.text.clone())
        .alignment(Alignment::Center)
        .style(Style::default().fg(color));
    frame.render_widget(line, area);
}
