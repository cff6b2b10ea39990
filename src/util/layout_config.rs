//! Layout configuration constants for the transfer window.

use crate::geometry::WindowSize;

/// Configuration for table layout.
#[derive(Debug, Clone)]
pub struct TableLayoutConfig {
    /// Pixels between adjacent columns.
    pub spacing: u32,
    /// Height of each row in pixels.
    pub row_height: u32,
}

impl Default for TableLayoutConfig {
    fn default() -> Self {
        Self {
            spacing: 4,
            row_height: 16,
        }
    }
}

/// Configuration for window placement.
#[derive(Debug, Clone, Copy)]
pub struct WindowLayoutConfig {
    /// Window width when vessel-specific columns are shown.
    pub width_with_vessel: f32,
    /// Window width without a vessel.
    pub width_without_vessel: f32,
    /// Window height.
    pub height: f32,
    /// Size of the measurement probe.
    pub probe_size: WindowSize,
}

impl WindowLayoutConfig {
    /// Size preset for the window.
    pub fn window_size(&self, has_controllable_vessel: bool) -> WindowSize {
        WindowSize {
            width: if has_controllable_vessel {
                self.width_with_vessel
            } else {
                self.width_without_vessel
            },
            height: self.height,
        }
    }
}

impl Default for WindowLayoutConfig {
    fn default() -> Self {
        Self {
            width_with_vessel: 480.0,
            width_without_vessel: 400.0,
            height: 320.0,
            probe_size: WindowSize {
                width: 16.0,
                height: 16.0,
            },
        }
    }
}

/// Configuration for mapping host pixels onto terminal cells.
#[derive(Debug, Clone, Copy)]
pub struct TerminalLayoutConfig {
    /// Pixels per terminal column.
    pub cell_width: f32,
    /// Pixels per terminal row.
    pub cell_height: f32,
    /// Frames between a probe spawn and its measurement.
    pub measurement_delay_frames: u32,
}

impl Default for TerminalLayoutConfig {
    fn default() -> Self {
        Self {
            cell_width: 6.0,
            cell_height: 16.0,
            measurement_delay_frames: 2,
        }
    }
}

/// Combined layout configuration.
#[derive(Debug, Clone, Default)]
pub struct LayoutConfig {
    /// Configuration for the table.
    pub table: TableLayoutConfig,
    /// Configuration for window placement.
    pub window: WindowLayoutConfig,
    /// Configuration for the terminal host.
    pub terminal: TerminalLayoutConfig,
}
