//! Status bar UI component.

use crate::geometry::CalibrationState;
use crate::ui::ThemeColors;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Draw the status bar: the last status message, then the UI scale and calibration state.
pub fn draw_status(
    f: &mut Frame<'_>,
    area: Rect,
    status: &str,
    scale_factor: f32,
    calibration: CalibrationState,
    colors: &ThemeColors,
) {
    let calibration = match calibration {
        CalibrationState::Uncalibrated => "uncalibrated",
        CalibrationState::Probing => "probing",
        CalibrationState::Calibrated => "calibrated",
    };
    let line = Line::from(vec![
        Span::raw(status.to_string()),
        Span::styled(
            format!("  [scale {:.2} | {}]", scale_factor, calibration),
            Style::default().fg(colors.hint),
        ),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    f.render_widget(paragraph, area);
}
