//! Persisted user settings and the stores that hold them.
//!
//! The view layer reads and writes settings only through [`SettingsStore`],
//! so tests can swap in [`MemorySettings`] while the binary uses
//! [`SettingsFile`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::columns::SortKey;
use crate::error::{AstrogationError, Result};
use crate::geometry::ScreenPoint;
use crate::sorting::SortState;

/// Unit system for displayed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayUnits {
    /// Système International d'Unités.
    #[default]
    Metric,
    /// United States customary units.
    UnitedStatesCustomary,
}

impl DisplayUnits {
    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            DisplayUnits::Metric => "Metric",
            DisplayUnits::UnitedStatesCustomary => "Imperial",
        }
    }
}

/// Boolean feature toggles editable from the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingToggle {
    /// Generate plane change burns.
    GeneratePlaneChangeBurns,
    /// Add plane change burns to the Δv column.
    AddPlaneChangeDeltaV,
    /// Auto-delete user-created maneuver nodes.
    DeleteExistingManeuvers,
    /// Calculate transfers to tracked asteroids.
    ShowTrackedAsteroids,
    /// Automatically target destination.
    AutoTargetDestination,
    /// Automatically focus destination.
    AutoFocusDestination,
    /// Automatically edit ejection node.
    AutoEditEjectionNode,
    /// Automatically edit plane change node.
    AutoEditPlaneChangeNode,
    /// Automatically set SAS to maneuver mode.
    AutoSetSas,
    /// Adjust nodes with translation controls when RCS is off.
    TranslationAdjust,
}

impl SettingToggle {
    /// All toggles in panel order.
    pub const ALL: [SettingToggle; 10] = [
        SettingToggle::GeneratePlaneChangeBurns,
        SettingToggle::AddPlaneChangeDeltaV,
        SettingToggle::DeleteExistingManeuvers,
        SettingToggle::ShowTrackedAsteroids,
        SettingToggle::AutoTargetDestination,
        SettingToggle::AutoFocusDestination,
        SettingToggle::AutoEditEjectionNode,
        SettingToggle::AutoEditPlaneChangeNode,
        SettingToggle::AutoSetSas,
        SettingToggle::TranslationAdjust,
    ];

    /// Label shown next to the checkbox.
    pub fn label(self) -> &'static str {
        match self {
            SettingToggle::GeneratePlaneChangeBurns => "Generate plane change burns",
            SettingToggle::AddPlaneChangeDeltaV => "Add plane change burns to Δv column",
            SettingToggle::DeleteExistingManeuvers => "Auto-delete user-created maneuver nodes",
            SettingToggle::ShowTrackedAsteroids => "Calculate transfers to tracked asteroids",
            SettingToggle::AutoTargetDestination => "Automatically target destination",
            SettingToggle::AutoFocusDestination => "Automatically focus destination",
            SettingToggle::AutoEditEjectionNode => "Automatically edit ejection node",
            SettingToggle::AutoEditPlaneChangeNode => "Automatically edit plane change node",
            SettingToggle::AutoSetSas => "Automatically set SAS to maneuver mode",
            SettingToggle::TranslationAdjust => {
                "Adjust nodes with translation controls when RCS is off"
            },
        }
    }
}

/// Everything persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Column rows are ordered by.
    pub sort_key: Option<SortKey>,
    /// Sort from largest to smallest.
    pub sort_descending: bool,
    /// Unit system for delta-v.
    pub display_units: DisplayUnits,
    /// Show the settings panel instead of the table.
    pub show_settings: bool,
    /// Main window position as a fraction of the screen.
    pub main_window_position: ScreenPoint,
    /// Generate plane change burns.
    pub generate_plane_change_burns: bool,
    /// Add plane change burns to the Δv column.
    pub add_plane_change_delta_v: bool,
    /// Auto-delete user-created maneuver nodes.
    pub delete_existing_maneuvers: bool,
    /// Calculate transfers to tracked asteroids.
    pub show_tracked_asteroids: bool,
    /// Automatically target destination.
    pub auto_target_destination: bool,
    /// Automatically focus destination.
    pub auto_focus_destination: bool,
    /// Automatically edit ejection node.
    pub auto_edit_ejection_node: bool,
    /// Automatically edit plane change node.
    pub auto_edit_plane_change_node: bool,
    /// Automatically set SAS to maneuver mode.
    pub auto_set_sas: bool,
    /// Adjust nodes with translation controls when RCS is off.
    pub translation_adjust: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort_key: None,
            sort_descending: false,
            display_units: DisplayUnits::Metric,
            show_settings: false,
            main_window_position: ScreenPoint::new(0.5, 0.5),
            generate_plane_change_burns: true,
            add_plane_change_delta_v: true,
            delete_existing_maneuvers: true,
            show_tracked_asteroids: false,
            auto_target_destination: true,
            auto_focus_destination: true,
            auto_edit_ejection_node: true,
            auto_edit_plane_change_node: false,
            auto_set_sas: true,
            translation_adjust: true,
        }
    }
}

impl Settings {
    /// Sort state stored in these settings.
    pub fn sort_state(&self) -> SortState {
        SortState {
            active_key: self.sort_key,
            descending: self.sort_descending,
        }
    }

    /// Store `state` as the sort selection.
    pub fn set_sort_state(&mut self, state: SortState) {
        self.sort_key = state.active_key;
        self.sort_descending = state.descending;
    }

    /// Current value of a toggle.
    pub fn flag(&self, toggle: SettingToggle) -> bool {
        match toggle {
            SettingToggle::GeneratePlaneChangeBurns => self.generate_plane_change_burns,
            SettingToggle::AddPlaneChangeDeltaV => self.add_plane_change_delta_v,
            SettingToggle::DeleteExistingManeuvers => self.delete_existing_maneuvers,
            SettingToggle::ShowTrackedAsteroids => self.show_tracked_asteroids,
            SettingToggle::AutoTargetDestination => self.auto_target_destination,
            SettingToggle::AutoFocusDestination => self.auto_focus_destination,
            SettingToggle::AutoEditEjectionNode => self.auto_edit_ejection_node,
            SettingToggle::AutoEditPlaneChangeNode => self.auto_edit_plane_change_node,
            SettingToggle::AutoSetSas => self.auto_set_sas,
            SettingToggle::TranslationAdjust => self.translation_adjust,
        }
    }

    /// Set a toggle.
    pub fn set_flag(&mut self, toggle: SettingToggle, value: bool) {
        let slot = match toggle {
            SettingToggle::GeneratePlaneChangeBurns => &mut self.generate_plane_change_burns,
            SettingToggle::AddPlaneChangeDeltaV => &mut self.add_plane_change_delta_v,
            SettingToggle::DeleteExistingManeuvers => &mut self.delete_existing_maneuvers,
            SettingToggle::ShowTrackedAsteroids => &mut self.show_tracked_asteroids,
            SettingToggle::AutoTargetDestination => &mut self.auto_target_destination,
            SettingToggle::AutoFocusDestination => &mut self.auto_focus_destination,
            SettingToggle::AutoEditEjectionNode => &mut self.auto_edit_ejection_node,
            SettingToggle::AutoEditPlaneChangeNode => &mut self.auto_edit_plane_change_node,
            SettingToggle::AutoSetSas => &mut self.auto_set_sas,
            SettingToggle::TranslationAdjust => &mut self.translation_adjust,
        };
        *slot = value;
    }
}

/// Read/write access to persisted settings.
pub trait SettingsStore {
    /// Current settings.
    fn load(&self) -> Result<Settings>;

    /// Replace the stored settings.
    fn save(&mut self, settings: &Settings) -> Result<()>;

    /// Load, apply `change`, and save.
    fn update(&mut self, change: &mut dyn FnMut(&mut Settings)) -> Result<Settings> {
        let mut settings = self.load()?;
        change(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}

/// Settings kept only in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    settings: Settings,
}

impl MemorySettings {
    /// Create a store holding `settings`.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings.clone())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        self.settings = settings.clone();
        Ok(())
    }
}

/// Settings persisted as a JSON file.
///
/// A missing file reads as defaults; every save rewrites the whole file.
#[derive(Debug)]
pub struct SettingsFile {
    path: PathBuf,
    cached: Settings,
}

impl SettingsFile {
    /// Open the settings file at `path`, reading it if it exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cached = if path.exists() {
            read_settings(&path)?
        } else {
            tracing::info!("No settings at {}, using defaults", path.display());
            Settings::default()
        };
        Ok(Self { path, cached })
    }

    /// Like [`SettingsFile::open`], but an unreadable file is logged and
    /// replaced by defaults. The file is rewritten on the next save.
    pub fn open_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("Ignoring settings at {}: {}", path.display(), e);
                Self {
                    path,
                    cached: Settings::default(),
                }
            },
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    let text =
        fs::read_to_string(path).map_err(|e| AstrogationError::file_open(path.to_path_buf(), e))?;
    serde_json::from_str(&text).map_err(|e| AstrogationError::json("settings file", e))
}

impl SettingsStore for SettingsFile {
    fn load(&self) -> Result<Settings> {
        Ok(self.cached.clone())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| AstrogationError::json("settings file", e))?;
        fs::write(&self.path, text)?;
        self.cached = settings.clone();
        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_round_trip_through_setters() {
        let mut settings = Settings::default();
        for toggle in SettingToggle::ALL {
            let before = settings.flag(toggle);
            settings.set_flag(toggle, !before);
            assert_eq!(settings.flag(toggle), !before, "{:?}", toggle);
        }
    }

    #[test]
    fn update_persists_change() {
        let mut store = MemorySettings::default();
        store
            .update(&mut |s| s.display_units = DisplayUnits::UnitedStatesCustomary)
            .unwrap();
        assert_eq!(
            store.load().unwrap().display_units,
            DisplayUnits::UnitedStatesCustomary
        );
    }

    #[test]
    fn settings_file_saves_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut file = SettingsFile::open(&path).unwrap();
        assert_eq!(file.load().unwrap(), Settings::default());

        let mut settings = Settings::default();
        settings.set_sort_state(SortState::ascending(SortKey::DeltaV));
        settings.main_window_position = ScreenPoint::new(0.25, 0.75);
        file.save(&settings).unwrap();

        let reopened = SettingsFile::open(&path).unwrap();
        assert_eq!(reopened.load().unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "sort_descending": true }"#).unwrap();

        let settings = SettingsFile::open(&path).unwrap().load().unwrap();
        assert!(settings.sort_descending);
        assert_eq!(settings.display_units, DisplayUnits::Metric);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            SettingsFile::open(&path),
            Err(AstrogationError::Json { .. })
        ));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let mut file = SettingsFile::open_or_default(&path);
        assert_eq!(file.load().unwrap(), Settings::default());

        let mut settings = Settings::default();
        settings.set_sort_state(SortState::ascending(SortKey::Name));
        file.save(&settings).unwrap();
        assert_eq!(SettingsFile::open(&path).unwrap().load().unwrap(), settings);
    }
}
