//! User interface rendering.

mod keymap_bar;
mod status_bar;
mod surface;
mod theme;

use crate::app::App;
use crate::geometry::SurfaceHost;
use crate::model::TransferModel;
use crate::settings::SettingsStore;
use crate::view::DISPLAY_NAME;
use keymap_bar::draw_keymap;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::Paragraph,
    Frame,
};
use status_bar::draw_status;

pub use surface::{column_cells, fit, node_lines, surface_rect};
pub use theme::ThemeColors;

/// Split the terminal into the host screen, status bar and key map bar.
pub fn screen_layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Draw the UI.
pub fn draw<M: TransferModel, S: SettingsStore>(f: &mut Frame<'_>, app: &App<M, S>) {
    let colors = ThemeColors::from_theme(&app.theme);
    let [screen, status, keymap] = screen_layout(f.area());

    let controller = &app.controller;
    let backdrop = Paragraph::new(vec![
        Line::from(DISPLAY_NAME),
        Line::from(format!("{} (press o)", controller.title())),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().fg(colors.hint).bg(colors.bg));
    f.render_widget(backdrop, screen);

    for placed in controller.host().surfaces() {
        surface::draw_surface(f, screen, placed, &app.layout, &colors);
    }

    draw_status(
        f,
        status,
        &app.status,
        controller.host().scale_factor(),
        controller.calibration_state(),
        &colors,
    );

    let settings_visible = controller
        .settings()
        .load()
        .map(|s| s.show_settings)
        .unwrap_or(false);
    draw_keymap(f, keymap, controller.is_open(), settings_visible, &colors);
}
