//! Keymap help bar UI component.

use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Draw the keymap help bar.
pub fn draw_keymap(
    f: &mut Frame<'_>,
    area: Rect,
    window_open: bool,
    settings_visible: bool,
    colors: &ThemeColors,
) {
    let keymap_text = if !window_open {
        "o:open | +-:scale | v/u/l:vessel/unlocked/landed | r:reload | T:theme | q:quit"
    } else if settings_visible {
        "1-9,0:toggle | m/i:units | s:table | ←↑↓→:move | o:close | q:quit"
    } else {
        "n/t/d/b:sort | s:settings | ←↑↓→:move | +-:scale | y:copy | o:close | q:quit"
    };

    let paragraph =
        Paragraph::new(keymap_text).style(Style::default().fg(colors.text).bg(colors.bg));

    f.render_widget(paragraph, area);
}
