//! Transfer catalog read from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{TransferModel, TransferRecord};
use crate::error::{AstrogationError, Result};
use crate::settings::Settings;

/// A single maneuver of a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Burn {
    /// Seconds until the burn.
    pub time_until: f64,
    /// Delta-v in m/s.
    pub delta_v: f64,
    /// Engine time in seconds, when a vessel is known.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// One catalog entry, before settings are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Destination body.
    pub destination: String,
    /// Destination is a tracked asteroid.
    #[serde(default)]
    pub asteroid: bool,
    /// Ejection burn, absent when none was found.
    #[serde(default)]
    pub ejection: Option<Burn>,
    /// Optional plane change burn.
    #[serde(default)]
    pub plane_change: Option<Burn>,
    /// Problem worth flagging.
    #[serde(default)]
    pub warning: Option<String>,
}

/// On-disk catalog layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Body or vessel transfers start from.
    #[serde(default)]
    pub origin: Option<String>,
    /// Failure reported by whatever computed the catalog.
    #[serde(default)]
    pub error: Option<String>,
    /// Transfers in source order.
    #[serde(default)]
    pub transfers: Vec<CatalogEntry>,
}

impl CatalogFile {
    /// Read a catalog file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| AstrogationError::file_open(path.to_path_buf(), e))?;
        serde_json::from_str(&text).map_err(|e| AstrogationError::json("transfer catalog", e))
    }

    /// Records visible under `settings`.
    pub fn records(&self, settings: &Settings) -> Vec<TransferRecord> {
        let with_plane_change =
            settings.generate_plane_change_burns && settings.add_plane_change_delta_v;

        self.transfers
            .iter()
            .filter(|entry| settings.show_tracked_asteroids || !entry.asteroid)
            .map(|entry| {
                let plane_change = entry.plane_change.as_ref().filter(|_| with_plane_change);
                let extra_dv = plane_change.map_or(0.0, |b| b.delta_v);
                let extra_duration = plane_change.and_then(|b| b.duration).unwrap_or(0.0);
                TransferRecord {
                    destination: entry.destination.clone(),
                    time_until_burn: entry.ejection.as_ref().map(|b| b.time_until),
                    delta_v: entry.ejection.as_ref().map(|b| b.delta_v + extra_dv),
                    burn_duration: entry
                        .ejection
                        .as_ref()
                        .and_then(|b| b.duration)
                        .map(|d| d + extra_duration),
                    warning: entry.warning.clone(),
                }
            })
            .collect()
    }
}

/// [`TransferModel`] backed by a JSON catalog; refreshing rereads the file.
#[derive(Debug)]
pub struct JsonCatalog {
    path: PathBuf,
    file: CatalogFile,
    records: Vec<TransferRecord>,
    load_error: Option<String>,
}

impl JsonCatalog {
    /// Load the catalog at `path` under `settings`.
    pub fn open(path: impl Into<PathBuf>, settings: &Settings) -> Self {
        let mut catalog = Self {
            path: path.into(),
            file: CatalogFile::default(),
            records: Vec::new(),
            load_error: None,
        };
        catalog.refresh(settings);
        catalog
    }

    /// Location of the catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransferModel for JsonCatalog {
    fn has_origin(&self) -> bool {
        self.file.origin.is_some()
    }

    fn origin_description(&self) -> String {
        self.file.origin.clone().unwrap_or_else(|| "nowhere".to_string())
    }

    fn transfers(&self) -> &[TransferRecord] {
        &self.records
    }

    fn error_condition(&self) -> Option<&str> {
        self.load_error.as_deref().or(self.file.error.as_deref())
    }

    fn refresh(&mut self, settings: &Settings) {
        match CatalogFile::read(&self.path) {
            Ok(file) => {
                self.file = file;
                self.load_error = None;
                tracing::info!(
                    "Loaded {} catalog entries from {}",
                    self.file.transfers.len(),
                    self.path.display()
                );
            },
            Err(e) => {
                tracing::error!("Error loading catalog: {}", e);
                self.file = CatalogFile::default();
                self.load_error = Some(e.to_string());
            },
        }
        self.records = self.file.records(settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burn(time_until: f64, delta_v: f64, duration: Option<f64>) -> Burn {
        Burn {
            time_until,
            delta_v,
            duration,
        }
    }

    fn file() -> CatalogFile {
        CatalogFile {
            origin: Some("Kerbin".to_string()),
            error: None,
            transfers: vec![
                CatalogEntry {
                    destination: "Duna".to_string(),
                    asteroid: false,
                    ejection: Some(burn(100.0, 1000.0, Some(60.0))),
                    plane_change: Some(burn(500.0, 50.0, Some(5.0))),
                    warning: None,
                },
                CatalogEntry {
                    destination: "Ast. HSJ-227".to_string(),
                    asteroid: true,
                    ejection: Some(burn(10.0, 300.0, None)),
                    plane_change: None,
                    warning: None,
                },
            ],
        }
    }

    #[test]
    fn plane_change_added_only_when_enabled() {
        let mut settings = Settings::default();
        settings.add_plane_change_delta_v = true;
        settings.generate_plane_change_burns = true;
        let with = file().records(&settings);
        assert_eq!(with[0].delta_v, Some(1050.0));
        assert_eq!(with[0].burn_duration, Some(65.0));

        settings.add_plane_change_delta_v = false;
        let without = file().records(&settings);
        assert_eq!(without[0].delta_v, Some(1000.0));
        assert_eq!(without[0].burn_duration, Some(60.0));
    }

    #[test]
    fn asteroids_follow_setting() {
        let mut settings = Settings::default();
        settings.show_tracked_asteroids = false;
        assert_eq!(file().records(&settings).len(), 1);
        settings.show_tracked_asteroids = true;
        assert_eq!(file().records(&settings).len(), 2);
    }

    #[test]
    fn missing_file_reports_error_condition() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = JsonCatalog::open(dir.path().join("absent.json"), &Settings::default());
        assert!(catalog.error_condition().is_some());
        assert!(!catalog.has_origin());
        assert!(catalog.transfers().is_empty());
    }

    #[test]
    fn refresh_rereads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let settings = Settings::default();

        fs::write(&path, serde_json::to_string(&CatalogFile::default()).unwrap()).unwrap();
        let mut catalog = JsonCatalog::open(&path, &settings);
        assert!(catalog.transfers().is_empty());

        fs::write(&path, serde_json::to_string(&file()).unwrap()).unwrap();
        catalog.refresh(&settings);
        assert_eq!(catalog.transfers().len(), 1);
        assert_eq!(catalog.origin_description(), "Kerbin");
    }
}
