//! Host surface rendering.
//!
//! Surfaces are positioned in host pixels relative to the screen centre.
//! A surface's position is its own centre; pixels map to terminal cells
//! through [`TerminalLayoutConfig`].

use super::ThemeColors;
use crate::geometry::SurfaceSkin;
use crate::host::PlacedSurface;
use crate::projection::{CellKind, HeaderCell, ProjectedTable};
use crate::util::{LayoutConfig, TerminalLayoutConfig};
use crate::view::{LabelStyle, ToggleTarget, ViewNode};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Terminal cells covered by `placed` inside `area`, clipped to it.
///
/// Returns `None` when the surface is entirely off screen.
pub fn surface_rect(placed: &PlacedSurface, area: Rect, terminal: &TerminalLayoutConfig) -> Option<Rect> {
    let size = placed.surface.geometry.size;
    let width = size.width / terminal.cell_width;
    let height = size.height / terminal.cell_height;
    let left = f32::from(area.x) + f32::from(area.width) / 2.0 + placed.actual.x / terminal.cell_width
        - width / 2.0;
    let top = f32::from(area.y) + f32::from(area.height) / 2.0 + placed.actual.y / terminal.cell_height
        - height / 2.0;

    let x0 = left.round().max(f32::from(area.x));
    let y0 = top.round().max(f32::from(area.y));
    let x1 = (left + width).round().min(f32::from(area.right()));
    let y1 = (top + height).round().min(f32::from(area.bottom()));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16))
}

/// Draw one surface. Probes use an invisible skin and draw nothing.
pub(super) fn draw_surface(
    f: &mut Frame<'_>,
    area: Rect,
    placed: &PlacedSurface,
    layout: &LayoutConfig,
    colors: &ThemeColors,
) {
    if placed.surface.skin == SurfaceSkin::Probe {
        return;
    }
    let Some(rect) = surface_rect(placed, area, &layout.terminal) else {
        return;
    };

    f.render_widget(Clear, rect);
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", placed.surface.title),
            Style::default().fg(colors.heading).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().fg(colors.text).bg(colors.window_bg));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let paragraph = Paragraph::new(node_lines(&placed.surface.content, layout, colors));
    f.render_widget(paragraph, inner);
}

/// Lay out a content tree as lines of text.
pub fn node_lines(node: &ViewNode, layout: &LayoutConfig, colors: &ThemeColors) -> Vec<Line<'static>> {
    match node {
        ViewNode::Empty => Vec::new(),
        ViewNode::Stack(children) => children
            .iter()
            .flat_map(|child| node_lines(child, layout, colors))
            .collect(),
        ViewNode::Label { text, style } => {
            let style = match style {
                LabelStyle::Heading => Style::default()
                    .fg(colors.heading)
                    .add_modifier(Modifier::BOLD),
                LabelStyle::Body => Style::default().fg(colors.text),
                LabelStyle::Error => Style::default().fg(colors.error),
                LabelStyle::Hint => Style::default().fg(colors.hint),
            };
            vec![Line::from(Span::styled(text.clone(), style))]
        },
        ViewNode::Link { text, .. } => vec![Line::from(Span::styled(
            text.clone(),
            Style::default()
                .fg(colors.link)
                .add_modifier(Modifier::UNDERLINED),
        ))],
        ViewNode::Toggle {
            target,
            label,
            checked,
        } => {
            let mark = match (target, checked) {
                (ToggleTarget::Setting(_), true) => "[x] ",
                (ToggleTarget::Setting(_), false) => "[ ] ",
                (ToggleTarget::Units(_), true) => "(•) ",
                (ToggleTarget::Units(_), false) => "( ) ",
            };
            vec![Line::from(vec![
                Span::styled(mark, Style::default().fg(colors.button)),
                Span::raw(label.clone()),
            ])]
        },
        ViewNode::Table(table) => table_lines(table, layout, colors),
    }
}

/// Character width of each retained column, trailing spacing included.
///
/// Column edges are rounded in pixel space so that a spanning header lines
/// up with the cells beneath it.
pub fn column_cells(table: &ProjectedTable, layout: &LayoutConfig) -> Vec<usize> {
    let pixels: Vec<u32> = match table.body_rows.first() {
        Some(row) => row.iter().map(|cell| cell.width).collect(),
        None => table
            .header_row
            .iter()
            .map(|header| match header {
                // Every column adds its own spacing below.
                HeaderCell::Head { width, span, .. } => {
                    width.saturating_sub(layout.table.spacing * span.saturating_sub(1))
                },
                HeaderCell::Continuation { .. } => 0,
            })
            .collect(),
    };

    let mut edge = 0u32;
    let mut previous = 0usize;
    pixels
        .into_iter()
        .map(|width| {
            edge += width + layout.table.spacing;
            let end = (edge as f32 / layout.terminal.cell_width).round() as usize;
            let cells = end.saturating_sub(previous);
            previous = end;
            cells
        })
        .collect()
}

fn table_lines(table: &ProjectedTable, layout: &LayoutConfig, colors: &ThemeColors) -> Vec<Line<'static>> {
    let widths = column_cells(table, layout);
    let row_lines = (layout.table.row_height as f32 / layout.terminal.cell_height)
        .round()
        .max(1.0) as usize;

    let mut header = Vec::new();
    for (i, cell) in table.header_row.iter().enumerate() {
        if let HeaderCell::Head { label, span, .. } = cell {
            let end = (i + *span as usize).min(widths.len());
            let width = widths[i.min(end)..end].iter().sum();
            header.push(Span::styled(
                fit(label, width, false),
                Style::default()
                    .fg(colors.heading)
                    .add_modifier(Modifier::BOLD),
            ));
        }
    }

    let mut lines = vec![Line::from(header)];
    for row in &table.body_rows {
        let spans: Vec<Span<'static>> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| match cell.kind {
                CellKind::Numeric => Span::raw(format!(
                    "{} ",
                    fit(&cell.text, width.saturating_sub(1), true)
                )),
                CellKind::Warning => {
                    Span::styled(fit(&cell.text, width, false), Style::default().fg(colors.warning))
                },
                CellKind::Button(_) => Span::styled(
                    fit(&cell.text, width, false),
                    Style::default()
                        .fg(colors.button)
                        .add_modifier(Modifier::BOLD),
                ),
                CellKind::Text => Span::raw(fit(&cell.text, width, false)),
            })
            .collect();
        lines.push(Line::from(spans));
        lines.extend((1..row_lines).map(|_| Line::default()));
    }
    lines
}

/// Truncate or pad `text` to exactly `width` terminal columns.
pub fn fit(text: &str, width: usize, right_align: bool) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    let pad = " ".repeat(width - used);
    if right_align {
        pad + &out
    } else {
        out + &pad
    }
}
