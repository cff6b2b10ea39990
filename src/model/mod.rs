//! Transfer data consumed by the view.
//!
//! The view treats the model as a read-only service: it asks for the origin,
//! the list of transfers and whether the computation failed.

mod catalog;

pub use catalog::{Burn, CatalogEntry, CatalogFile, JsonCatalog};

use crate::columns::SortKey;
use crate::settings::Settings;
use crate::sorting::{RowRecord, SortValue};

/// One computed transfer opportunity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransferRecord {
    /// Destination body.
    pub destination: String,
    /// Seconds until the ejection burn.
    pub time_until_burn: Option<f64>,
    /// Total delta-v in m/s.
    pub delta_v: Option<f64>,
    /// Seconds of engine time for the active vessel.
    pub burn_duration: Option<f64>,
    /// Problem with this transfer worth flagging.
    pub warning: Option<String>,
}

impl TransferRecord {
    /// Create a record with only a destination.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }
}

impl RowRecord for TransferRecord {
    fn sort_value(&self, key: SortKey) -> SortValue<'_> {
        let number = |v: Option<f64>| v.map_or(SortValue::Missing, SortValue::Number);
        match key {
            SortKey::Name => SortValue::Text(&self.destination),
            SortKey::Time => number(self.time_until_burn),
            SortKey::DeltaV => number(self.delta_v),
            SortKey::BurnDuration => number(self.burn_duration),
        }
    }
}

/// Source of transfer opportunities.
pub trait TransferModel {
    /// Check whether there is a body to transfer from.
    fn has_origin(&self) -> bool;

    /// Human-readable origin, used in the window title.
    fn origin_description(&self) -> String;

    /// Computed transfers in source order.
    fn transfers(&self) -> &[TransferRecord];

    /// Diagnostic when the computation failed.
    fn error_condition(&self) -> Option<&str>;

    /// Recompute the transfers.
    fn refresh(&mut self, settings: &Settings);
}

/// A fixed model, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticModel {
    /// Origin description; `None` means no origin.
    pub origin: Option<String>,
    /// Transfers in source order.
    pub transfers: Vec<TransferRecord>,
    /// Diagnostic for a failed computation.
    pub error: Option<String>,
    /// Number of refreshes requested.
    pub refreshes: usize,
}

impl StaticModel {
    /// Create a model from `origin` with `transfers`.
    pub fn new(origin: impl Into<String>, transfers: Vec<TransferRecord>) -> Self {
        Self {
            origin: Some(origin.into()),
            transfers,
            error: None,
            refreshes: 0,
        }
    }
}

impl TransferModel for StaticModel {
    fn has_origin(&self) -> bool {
        self.origin.is_some()
    }

    fn origin_description(&self) -> String {
        self.origin.clone().unwrap_or_default()
    }

    fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    fn error_condition(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn refresh(&mut self, _settings: &Settings) {
        self.refreshes += 1;
    }
}
