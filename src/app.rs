//! Application state and logic.

use crate::clipboard;
use crate::columns::{SortKey, ViewContext};
use crate::geometry::{CalibrationState, OpenOutcome, ScreenSize, SurfaceHost};
use crate::host::SimulatedHost;
use crate::model::{JsonCatalog, TransferModel};
use crate::settings::{DisplayUnits, SettingsFile, SettingsStore};
use crate::util::LayoutConfig;
use crate::view::{panel_toggles, ViewController};

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// Context flags the user can flip from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFlag {
    /// A controllable vessel is present.
    Vessel,
    /// Maneuver nodes are unlocked.
    Unlocked,
    /// The vessel is landed.
    Landed,
}

/// UI scale change per key press.
pub const SCALE_STEP: f32 = 0.1;

/// Controller type the binary runs.
pub type TransferController<M = JsonCatalog, S = SettingsFile> =
    ViewController<SimulatedHost, M, S, ViewContext>;

/// Application state.
#[derive(Debug)]
pub struct App<M = JsonCatalog, S = SettingsFile> {
    /// The transfer window controller.
    pub controller: TransferController<M, S>,
    /// Status message.
    pub status: String,
    /// Current theme.
    pub theme: Theme,
    /// Layout constants, including the pixel size of a terminal cell.
    pub layout: LayoutConfig,
}

impl<M: TransferModel, S: SettingsStore> App<M, S> {
    /// Create a new application instance.
    pub fn new(controller: TransferController<M, S>, layout: LayoutConfig) -> Self {
        let status = match controller.model().error_condition() {
            Some(e) => format!("Catalog problem: {}", e),
            None => format!("{} transfers loaded", controller.model().transfers().len()),
        };
        Self {
            controller,
            status,
            theme: Theme::GruvboxDark,
            layout,
        }
    }

    /// Resize the simulated screen to a terminal of `cols` x `rows` cells.
    pub fn sync_screen(&mut self, cols: u16, rows: u16) {
        let screen = ScreenSize {
            width: f32::from(cols) * self.layout.terminal.cell_width,
            height: f32::from(rows) * self.layout.terminal.cell_height,
        };
        let host = self.controller.host_mut();
        if host.screen_size() != screen {
            tracing::debug!("Screen resized to {}x{} px", screen.width, screen.height);
            host.set_screen_size(screen);
        }
    }

    /// Advance the host one frame and forward finished measurements.
    pub fn tick(&mut self) {
        let measurements = self.controller.host_mut().tick();
        for measurement in measurements {
            if let Some(outcome) = self
                .controller
                .probe_measured(measurement.handle, measurement.actual)
            {
                self.report_open(outcome);
            }
        }
    }

    /// Open the window, or close it if it is already open.
    pub fn toggle_window(&mut self) {
        if self.controller.is_open() || self.controller.calibrator().pending_probe().is_some() {
            self.controller.close();
            self.status = "Window closed".to_string();
        } else {
            let outcome = self.controller.open();
            self.report_open(outcome);
        }
    }

    fn report_open(&mut self, outcome: OpenOutcome) {
        self.status = match outcome {
            OpenOutcome::Committed(_) => format!("Opened {}", self.controller.title()),
            OpenOutcome::Probing(_) | OpenOutcome::AwaitingProbe(_) => format!(
                "Calibrating for UI scale {:.2}...",
                self.controller.host().scale_factor()
            ),
            OpenOutcome::AlreadyOpen(_) => "Window already open".to_string(),
        };
    }

    /// Sort by the header carrying `key`.
    pub fn click_header(&mut self, key: SortKey) {
        if !self.controller.header_clicked(key) {
            self.status = format!("No {} column in view", key.name());
            return;
        }
        let state = self.controller.sort_state();
        self.status = match state.active_key {
            Some(key) if state.descending => format!("Sorted by {} descending", key.name()),
            Some(key) => format!("Sorted by {} ascending", key.name()),
            None => "Unsorted".to_string(),
        };
    }

    /// Show or hide the settings panel.
    pub fn toggle_settings(&mut self) {
        self.controller.toggle_settings_panel();
        self.status = "Settings toggled".to_string();
    }

    /// Flip the setting at `index` in panel order.
    pub fn toggle_setting_at(&mut self, index: usize) {
        let Some(setting) = panel_toggles().nth(index) else {
            return;
        };
        self.controller.toggle_setting(setting);
        let on = self
            .controller
            .settings()
            .load()
            .map(|s| s.flag(setting))
            .unwrap_or_default();
        self.status = format!("{}: {}", setting.label(), if on { "on" } else { "off" });
    }

    /// Choose the unit system.
    pub fn select_units(&mut self, units: DisplayUnits) {
        self.controller.select_units(units);
        self.status = format!("Units: {}", units.name());
    }

    /// Flip a context flag and rebuild.
    pub fn toggle_context(&mut self, flag: ContextFlag) {
        let context = self.controller.context_source_mut();
        let (name, value) = match flag {
            ContextFlag::Vessel => {
                context.has_controllable_vessel = !context.has_controllable_vessel;
                ("Vessel", context.has_controllable_vessel)
            },
            ContextFlag::Unlocked => {
                context.capability_unlocked = !context.capability_unlocked;
                ("Maneuver nodes", context.capability_unlocked)
            },
            ContextFlag::Landed => {
                context.is_landed = !context.is_landed;
                ("Landed", context.is_landed)
            },
        };
        self.controller.rebuild(false);
        self.status = format!("{}: {}", name, if value { "yes" } else { "no" });
    }

    /// Change the host UI scale by `delta`; an open window is recommitted.
    pub fn change_scale(&mut self, delta: f32) {
        let host = self.controller.host_mut();
        host.set_scale_factor(host.scale_factor() + delta);
        let scale = host.scale_factor();
        self.controller.rebuild(false);
        self.status = match self.controller.calibration_state() {
            CalibrationState::Calibrated => format!("UI scale {:.2}", scale),
            CalibrationState::Probing => format!("UI scale {:.2}, calibrating...", scale),
            CalibrationState::Uncalibrated => {
                format!("UI scale {:.2}, calibrates on next open", scale)
            },
        };
    }

    /// Drag the open window by a number of terminal cells.
    pub fn move_window(&mut self, cols: i32, rows: i32) {
        let Some(window) = self.controller.calibrator().window() else {
            self.status = "No window open".to_string();
            return;
        };
        let dx = cols as f32 * self.layout.terminal.cell_width;
        let dy = rows as f32 * self.layout.terminal.cell_height;
        self.controller.host_mut().move_surface(window, dx, dy);
    }

    /// Reload the model and rebuild.
    pub fn reset(&mut self) {
        self.controller.rebuild(true);
        self.status = match self.controller.model().error_condition() {
            Some(e) => format!("Reload failed: {}", e),
            None => format!(
                "Reloaded {} transfers",
                self.controller.model().transfers().len()
            ),
        };
    }

    /// Copy the projected table to the clipboard.
    pub fn copy_table(&mut self) {
        let result = self
            .controller
            .projected_table()
            .and_then(|table| clipboard::copy_table(&table));
        self.status = match result {
            Ok(()) => "Table copied!".to_string(),
            Err(e) => format!("Copy failed: {}", e),
        };
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme: {}", self.theme.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CalibrationCache;
    use crate::model::{StaticModel, TransferRecord};
    use crate::settings::{MemorySettings, SettingToggle};

    fn app() -> App<StaticModel, MemorySettings> {
        let mut record = TransferRecord::new("Duna");
        record.time_until_burn = Some(1000.0);
        record.delta_v = Some(1050.0);
        let host = SimulatedHost::new(
            ScreenSize {
                width: 1600.0,
                height: 800.0,
            },
            1.0,
        )
        .with_measurement_delay(0);
        let controller = ViewController::with_calibration_cache(
            host,
            StaticModel::new("Kerbin", vec![record]),
            MemorySettings::default(),
            ViewContext::default(),
            LayoutConfig::default(),
            CalibrationCache::new(),
        );
        App::new(controller, LayoutConfig::default())
    }

    #[test]
    fn open_completes_after_tick() {
        let mut app = app();
        app.toggle_window();
        assert!(!app.controller.is_open());
        assert!(app.status.starts_with("Calibrating"));

        app.tick();
        assert!(app.controller.is_open());
        assert_eq!(app.status, "Opened Transfers from Kerbin");
    }

    #[test]
    fn toggle_window_closes_pending_probe() {
        let mut app = app();
        app.toggle_window();
        app.toggle_window();
        assert!(app.controller.calibrator().pending_probe().is_none());
        assert!(app.controller.host().surfaces().is_empty());
    }

    #[test]
    fn digit_index_follows_panel_order() {
        let mut app = app();
        app.toggle_setting_at(3);
        let settings = app.controller.settings().load().unwrap();
        assert!(settings.flag(SettingToggle::ShowTrackedAsteroids));
        app.toggle_setting_at(42);
    }

    #[test]
    fn moved_window_position_survives_reopen() {
        let mut app = app();
        app.toggle_window();
        app.tick();
        app.move_window(10, 5);
        app.toggle_window();

        let position = app.controller.settings().load().unwrap().main_window_position;
        assert!((position.x - 0.5375).abs() < 1e-4);
        assert!((position.y - 0.6).abs() < 1e-4);
    }

    #[test]
    fn scale_change_reprobes_open_window() {
        let mut app = app();
        app.toggle_window();
        app.tick();
        app.change_scale(2.0 * SCALE_STEP);
        assert_eq!(app.controller.calibration_state(), CalibrationState::Probing);
        app.tick();
        assert!(app.controller.is_open());
        assert_eq!(app.controller.host().probe_count(), 2);
    }

    #[test]
    fn hidden_header_click_reports_and_keeps_sort() {
        let mut app = app();
        app.click_header(SortKey::DeltaV);
        assert_eq!(app.status, "Sorted by Δv ascending");

        app.click_header(SortKey::BurnDuration);
        assert_eq!(app.status, "No Burn column in view");
        assert_eq!(
            app.controller.sort_state(),
            crate::sorting::SortState::ascending(SortKey::DeltaV)
        );
    }
}
