//! Transfer view - orchestrates settings, model, sorting and window placement.
//!
//! [`ViewController`] owns the sort state and the window's
//! [`GeometryCalibrator`]. Every change (header click, settings toggle, data
//! refresh) ends in [`ViewController::rebuild`], which recomputes the content
//! tree and recommits the window if one is open.

mod nodes;
mod settings_panel;

pub use nodes::{LabelStyle, ToggleTarget, ViewNode};
pub use settings_panel::{panel_toggles, settings_panel, MANUAL_URL};

use crate::columns::{SortKey, ViewContext, COLUMNS};
use crate::error::Result;
use crate::geometry::{
    CalibrationCache, CalibrationState, GeometryCalibrator, OpenOutcome, OpenRequest, PixelPoint,
    SurfaceHandle, SurfaceHost,
};
use crate::model::TransferModel;
use crate::projection::{
    format::Calendar, project, project_records, ProjectedTable, ProjectionOptions,
};
use crate::settings::{DisplayUnits, SettingToggle, Settings, SettingsStore};
use crate::sorting::{toggle, SortState};
use crate::util::LayoutConfig;

/// The user-facing name of the window.
pub const DISPLAY_NAME: &str = "Astrogator";

/// Source of the runtime flags that decide column visibility.
pub trait ContextSource {
    /// Current flags.
    fn context(&self) -> ViewContext;
}

impl ContextSource for ViewContext {
    fn context(&self) -> ViewContext {
        *self
    }
}

/// Why the model cannot be shown as a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataProblem {
    /// The model reported a failure.
    ModelError(String),
    /// There is nothing to transfer from.
    NoOrigin,
    /// The computation produced no transfers.
    NoTransfers,
}

impl DataProblem {
    /// Check `model` for a reason it cannot be tabulated.
    pub fn of<M: TransferModel + ?Sized>(model: &M) -> Option<Self> {
        if let Some(message) = model.error_condition() {
            Some(DataProblem::ModelError(message.to_string()))
        } else if !model.has_origin() {
            Some(DataProblem::NoOrigin)
        } else if model.transfers().is_empty() {
            Some(DataProblem::NoTransfers)
        } else {
            None
        }
    }

    /// Diagnostic shown in the error panel.
    pub fn message(&self) -> String {
        match self {
            DataProblem::ModelError(message) => format!("Transfer calculation failed: {}", message),
            DataProblem::NoOrigin => "No origin to transfer from".to_string(),
            DataProblem::NoTransfers => "No transfers available".to_string(),
        }
    }
}

/// Top-level controller for the transfer window.
#[derive(Debug)]
pub struct ViewController<H, M, S, C> {
    host: H,
    model: M,
    settings: S,
    context: C,
    layout: LayoutConfig,
    calendar: Calendar,
    sort_state: SortState,
    calibrator: GeometryCalibrator,
}

impl<H, M, S, C> ViewController<H, M, S, C>
where
    H: SurfaceHost,
    M: TransferModel,
    S: SettingsStore,
    C: ContextSource,
{
    /// Create a controller using the process-wide calibration cache.
    pub fn new(host: H, model: M, settings: S, context: C, layout: LayoutConfig) -> Self {
        Self::with_calibration_cache(host, model, settings, context, layout, CalibrationCache::shared())
    }

    /// Create a controller with an explicit calibration cache.
    pub fn with_calibration_cache(
        host: H,
        model: M,
        settings: S,
        context: C,
        layout: LayoutConfig,
        cache: CalibrationCache,
    ) -> Self {
        let stored = settings.load().unwrap_or_else(|e| {
            tracing::error!("Problem reading settings, using defaults: {}", e);
            Settings::default()
        });
        let calibrator = GeometryCalibrator::new(cache, layout.window, stored.main_window_position);

        Self {
            host,
            model,
            settings,
            context,
            layout,
            calendar: Calendar::default(),
            sort_state: stored.sort_state(),
            calibrator,
        }
    }

    /// The host surface service.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, for the shell's event loop.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The transfer model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The settings store.
    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// The context source.
    pub fn context_source(&self) -> &C {
        &self.context
    }

    /// Mutable access to the context source. Call [`Self::rebuild`] afterwards.
    pub fn context_source_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Current sort selection.
    pub fn sort_state(&self) -> SortState {
        self.sort_state
    }

    /// The window placement state machine.
    pub fn calibrator(&self) -> &GeometryCalibrator {
        &self.calibrator
    }

    /// Calibration state at the host's current scale.
    pub fn calibration_state(&self) -> CalibrationState {
        self.calibrator.state(self.host.scale_factor())
    }

    /// Check whether the real window is on screen.
    pub fn is_open(&self) -> bool {
        self.calibrator.window().is_some()
    }

    /// Window title.
    pub fn title(&self) -> String {
        format!("Transfers from {}", self.model.origin_description())
    }

    /// Project the model with the current context, sort and units.
    pub fn projected_table(&self) -> Result<ProjectedTable> {
        let settings = self.settings.load()?;
        Ok(self.project_with(&settings))
    }

    fn project_with(&self, settings: &Settings) -> ProjectedTable {
        let options = ProjectionOptions {
            units: settings.display_units,
            spacing: self.layout.table.spacing,
            calendar: self.calendar,
        };
        project(&self.model, &self.context.context(), &self.sort_state, &options)
    }

    /// Content the window shows right now.
    ///
    /// Construction failures are logged and yield [`ViewNode::Empty`].
    pub fn content(&self) -> ViewNode {
        match self.build_content() {
            Ok(node) => node,
            Err(e) => {
                tracing::error!("Problem constructing view: {}", e);
                ViewNode::Empty
            },
        }
    }

    fn build_content(&self) -> Result<ViewNode> {
        let settings = self.settings.load()?;
        if settings.show_settings {
            return Ok(settings_panel(&settings));
        }
        if let Some(problem) = DataProblem::of(&self.model) {
            tracing::debug!("Showing error panel: {:?}", problem);
            return Ok(ViewNode::Stack(vec![ViewNode::label(
                problem.message(),
                LabelStyle::Error,
            )]));
        }

        let table = self.project_with(&settings);
        let footer = match table.effective_sort.active_key {
            Some(key) => format!(
                "Sorted by {} ({})",
                key.name(),
                if table.effective_sort.descending {
                    "descending"
                } else {
                    "ascending"
                }
            ),
            None => "Unsorted".to_string(),
        };
        Ok(ViewNode::Stack(vec![
            ViewNode::Table(table),
            ViewNode::label(footer, LabelStyle::Hint),
        ]))
    }

    /// Open the window, probing first if the scale is uncalibrated.
    pub fn open(&mut self) -> OpenOutcome {
        let request = OpenRequest {
            title: self.title(),
            content: self.content(),
            has_controllable_vessel: self.context.context().has_controllable_vessel,
        };
        self.calibrator.request_open(&mut self.host, request)
    }

    /// Close the window, remembering where it was.
    pub fn close(&mut self) {
        let Some(position) = self.calibrator.close(&mut self.host) else {
            return;
        };
        tracing::debug!("Window closed at ({:.3}, {:.3})", position.x, position.y);
        self.persist(|s| s.main_window_position = position);
    }

    /// Feed a host measurement; opens the window when it completes a probe.
    pub fn probe_measured(&mut self, handle: SurfaceHandle, actual: PixelPoint) -> Option<OpenOutcome> {
        if self.calibrator.probe_measured(&mut self.host, handle, actual) {
            Some(self.open())
        } else {
            None
        }
    }

    /// Recompute content, refreshing the model first when `reset_model`.
    ///
    /// An open window is dismissed and recommitted with the new content.
    pub fn rebuild(&mut self, reset_model: bool) {
        tracing::debug!("Rebuilding view (reset model: {})", reset_model);
        if reset_model {
            match self.settings.load() {
                Ok(settings) => self.model.refresh(&settings),
                Err(e) => tracing::error!("Problem reading settings for refresh: {}", e),
            }
        }
        if self.is_open() {
            self.close();
            self.open();
        }
    }

    /// Handle a click on the header sorting by `key`.
    ///
    /// Returns `false`, changing nothing, when no header on screen carries
    /// `key`.
    pub fn header_clicked(&mut self, key: SortKey) -> bool {
        if !self.has_header(key) {
            tracing::debug!("Ignoring sort by {}: no header in view", key.name());
            return false;
        }
        self.sort_state = toggle(self.sort_state, key);
        let state = self.sort_state;
        self.persist(|s| s.set_sort_state(state));
        self.rebuild(false);
        true
    }

    fn has_header(&self, key: SortKey) -> bool {
        let options = ProjectionOptions {
            spacing: self.layout.table.spacing,
            ..ProjectionOptions::default()
        };
        project_records(&COLUMNS, &[], &self.context.context(), &SortState::default(), &options)
            .header_row
            .iter()
            .any(|h| h.sort_key() == Some(key))
    }

    /// Switch between the settings panel and the table.
    pub fn toggle_settings_panel(&mut self) {
        self.persist(|s| s.show_settings = !s.show_settings);
        self.rebuild(false);
    }

    /// Flip a boolean setting.
    ///
    /// Settings that change what the model computes rebuild with a refresh.
    pub fn toggle_setting(&mut self, setting: SettingToggle) {
        self.persist(|s| s.set_flag(setting, !s.flag(setting)));
        let reset_model = matches!(
            setting,
            SettingToggle::GeneratePlaneChangeBurns
                | SettingToggle::AddPlaneChangeDeltaV
                | SettingToggle::ShowTrackedAsteroids
        );
        self.rebuild(reset_model);
    }

    /// Choose the unit system.
    pub fn select_units(&mut self, units: DisplayUnits) {
        self.persist(|s| s.display_units = units);
        self.rebuild(false);
    }

    fn persist(&mut self, mut change: impl FnMut(&mut Settings)) {
        if let Err(e) = self.settings.update(&mut change) {
            tracing::error!("Problem saving settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StaticModel, TransferRecord};
    use crate::settings::MemorySettings;
    use crate::geometry::ScreenSize;
    use crate::host::SimulatedHost;

    const SCREEN: ScreenSize = ScreenSize {
        width: 1600.0,
        height: 900.0,
    };

    type Controller = ViewController<SimulatedHost, StaticModel, MemorySettings, ViewContext>;

    fn controller(model: StaticModel, context: ViewContext) -> Controller {
        ViewController::with_calibration_cache(
            SimulatedHost::new(SCREEN, 1.0),
            model,
            MemorySettings::default(),
            context,
            LayoutConfig::default(),
            CalibrationCache::new(),
        )
    }

    fn model() -> StaticModel {
        let mut a = TransferRecord::new("Eve");
        a.delta_v = Some(120.0);
        a.time_until_burn = Some(10.0);
        let mut b = TransferRecord::new("Duna");
        b.delta_v = Some(95.0);
        b.time_until_burn = Some(20.0);
        StaticModel::new("Kerbin", vec![a, b])
    }

    fn vessel() -> ViewContext {
        ViewContext {
            has_controllable_vessel: true,
            capability_unlocked: true,
            is_landed: false,
        }
    }

    #[test]
    fn error_states_never_show_table() {
        let mut no_origin = model();
        no_origin.origin = None;
        let mut failed = model();
        failed.error = Some("boom".to_string());
        let empty = StaticModel::new("Kerbin", vec![]);

        for m in [no_origin, failed, empty] {
            let c = controller(m, vessel());
            let content = c.content();
            assert!(content.is_error());
            assert!(content.table().is_none());
        }
    }

    #[test]
    fn settings_panel_takes_precedence() {
        let mut failed = model();
        failed.error = Some("boom".to_string());
        let mut c = controller(failed, vessel());
        c.toggle_settings_panel();
        let content = c.content();
        assert!(!content.is_error());
        assert!(content
            .walk()
            .iter()
            .any(|n| matches!(n, ViewNode::Toggle { .. })));
    }

    #[test]
    fn header_click_persists_and_reorders() {
        let mut c = controller(model(), vessel());
        c.header_clicked(SortKey::DeltaV);
        assert_eq!(c.settings().load().unwrap().sort_key, Some(SortKey::DeltaV));
        let table = c.projected_table().unwrap();
        assert_eq!(table.body_rows[0][0].text, "Duna");

        c.header_clicked(SortKey::DeltaV);
        assert!(c.settings().load().unwrap().sort_descending);
        assert_eq!(c.projected_table().unwrap().body_rows[0][0].text, "Eve");
    }

    #[test]
    fn sort_state_seeded_from_settings() {
        let mut settings = Settings::default();
        settings.set_sort_state(SortState::ascending(SortKey::Name));
        let c = ViewController::with_calibration_cache(
            SimulatedHost::new(SCREEN, 1.0),
            model(),
            MemorySettings::new(settings),
            vessel(),
            LayoutConfig::default(),
            CalibrationCache::new(),
        );
        assert_eq!(c.sort_state(), SortState::ascending(SortKey::Name));
    }

    #[test]
    fn model_settings_refresh_the_model() {
        let mut c = controller(model(), vessel());
        c.toggle_setting(SettingToggle::ShowTrackedAsteroids);
        assert_eq!(c.model().refreshes, 1);
        c.toggle_setting(SettingToggle::AutoSetSas);
        assert_eq!(c.model().refreshes, 1);
        c.select_units(DisplayUnits::UnitedStatesCustomary);
        assert_eq!(c.model().refreshes, 1);
        assert_eq!(
            c.settings().load().unwrap().display_units,
            DisplayUnits::UnitedStatesCustomary
        );
    }

    #[test]
    fn title_names_origin() {
        assert_eq!(controller(model(), vessel()).title(), "Transfers from Kerbin");
    }

    #[derive(Debug)]
    struct BrokenSettings;

    impl SettingsStore for BrokenSettings {
        fn load(&self) -> Result<Settings> {
            Err(crate::AstrogationError::settings("store offline"))
        }

        fn save(&mut self, _settings: &Settings) -> Result<()> {
            Err(crate::AstrogationError::settings("store offline"))
        }
    }

    #[test]
    fn unreadable_settings_degrade_to_empty_content() {
        let mut c = ViewController::with_calibration_cache(
            SimulatedHost::new(SCREEN, 1.0).with_measurement_delay(0),
            model(),
            BrokenSettings,
            vessel(),
            LayoutConfig::default(),
            CalibrationCache::new(),
        );
        assert_eq!(c.content(), ViewNode::Empty);

        // Failed saves are logged; the sort still applies in memory.
        c.header_clicked(SortKey::Name);
        assert_eq!(c.sort_state(), SortState::ascending(SortKey::Name));
    }

    #[test]
    fn hidden_sort_column_falls_back_to_source_order() {
        let mut m = model();
        m.transfers[0].burn_duration = Some(90.0);
        m.transfers[1].burn_duration = Some(30.0);
        let mut c = controller(m, vessel());
        c.header_clicked(SortKey::BurnDuration);
        assert_eq!(c.projected_table().unwrap().body_rows[0][0].text, "Duna");

        c.context_source_mut().has_controllable_vessel = false;
        c.rebuild(false);
        let table = c.projected_table().unwrap();
        assert_eq!(table.body_rows[0][0].text, "Eve");
        assert_eq!(table.effective_sort, SortState::default());
        assert_eq!(c.sort_state(), SortState::ascending(SortKey::BurnDuration));
    }

    #[test]
    fn click_on_hidden_header_is_ignored() {
        let mut c = controller(model(), ViewContext::default());
        c.header_clicked(SortKey::DeltaV);

        assert!(!c.header_clicked(SortKey::BurnDuration));
        assert_eq!(c.sort_state(), SortState::ascending(SortKey::DeltaV));
        assert_eq!(c.settings().load().unwrap().sort_key, Some(SortKey::DeltaV));
        assert_eq!(
            c.projected_table().unwrap().effective_sort,
            SortState::ascending(SortKey::DeltaV)
        );

        c.context_source_mut().has_controllable_vessel = true;
        assert!(c.header_clicked(SortKey::BurnDuration));
        assert_eq!(c.sort_state(), SortState::ascending(SortKey::BurnDuration));
    }
}
