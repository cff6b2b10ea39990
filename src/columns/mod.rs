//! Column registry - the fixed, ordered set of table columns.
//!
//! Declaration order is both header order and cell order. Visibility of each
//! column is decided per rebuild from a [`ViewContext`] snapshot.

use serde::{Deserialize, Serialize};

/// Attribute by which transfer rows may be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    /// Destination name.
    Name,
    /// Time until the ejection burn.
    Time,
    /// Total delta-v of the transfer.
    DeltaV,
    /// Burn duration for the active vessel.
    BurnDuration,
}

impl SortKey {
    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Time => "Time",
            SortKey::DeltaV => "Δv",
            SortKey::BurnDuration => "Burn",
        }
    }
}

/// Identifies which value a column displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnId {
    /// Destination body name.
    Destination,
    /// Years until burn.
    Years,
    /// Days until burn.
    Days,
    /// Hours until burn.
    Hours,
    /// Minutes until burn.
    Minutes,
    /// Seconds until burn.
    Seconds,
    /// Delta-v of the transfer.
    DeltaV,
    /// Burn duration with the active vessel's engines.
    BurnTime,
    /// Warning marker.
    Warning,
    /// Create-maneuver button.
    Maneuver,
    /// Warp-to-burn button.
    Warp,
}

/// Immutable definition of one table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Which value this column displays.
    pub id: ColumnId,
    /// Header label; empty for unlabelled or covered columns.
    pub header: &'static str,
    /// Width in host pixels.
    pub pixel_width: u32,
    /// Number of columns (this one included) the header label spans.
    pub header_col_span: u32,
    /// Only shown when a controllable vessel exists.
    pub vessel_specific: bool,
    /// Only shown when the capability is unlocked and the vessel is in flight.
    pub requires_unlocked_capability: bool,
    /// Sort key reached by clicking this column's header.
    pub sort_key: Option<SortKey>,
}

impl ColumnDefinition {
    const fn new(id: ColumnId, header: &'static str, pixel_width: u32) -> Self {
        Self {
            id,
            header,
            pixel_width,
            header_col_span: 1,
            vessel_specific: false,
            requires_unlocked_capability: false,
            sort_key: None,
        }
    }

    const fn span(mut self, header_col_span: u32) -> Self {
        self.header_col_span = header_col_span;
        self
    }

    const fn vessel(mut self) -> Self {
        self.vessel_specific = true;
        self
    }

    const fn unlock(mut self) -> Self {
        self.requires_unlocked_capability = true;
        self
    }

    const fn sorted_by(mut self, key: SortKey) -> Self {
        self.sort_key = Some(key);
        self
    }

    /// Check whether this column is shown in the given context.
    pub fn is_visible(&self, context: &ViewContext) -> bool {
        let vessel_ok = !self.vessel_specific || context.has_controllable_vessel;
        let unlock_ok = !self.requires_unlocked_capability
            || (context.capability_unlocked
                && context.has_controllable_vessel
                && !context.is_landed);
        vessel_ok && unlock_ok
    }
}

/// Every column, in display order.
pub static COLUMNS: [ColumnDefinition; 11] = [
    ColumnDefinition::new(ColumnId::Destination, "Transfer", 72).sorted_by(SortKey::Name),
    ColumnDefinition::new(ColumnId::Years, "Time Till Burn", 32)
        .span(5)
        .sorted_by(SortKey::Time),
    ColumnDefinition::new(ColumnId::Days, "", 32),
    ColumnDefinition::new(ColumnId::Hours, "", 24),
    ColumnDefinition::new(ColumnId::Minutes, "", 24),
    ColumnDefinition::new(ColumnId::Seconds, "", 24),
    ColumnDefinition::new(ColumnId::DeltaV, "Δv", 64).sorted_by(SortKey::DeltaV),
    ColumnDefinition::new(ColumnId::BurnTime, "Burn", 48)
        .vessel()
        .sorted_by(SortKey::BurnDuration),
    ColumnDefinition::new(ColumnId::Warning, "", 16),
    ColumnDefinition::new(ColumnId::Maneuver, "", 24).vessel().unlock(),
    ColumnDefinition::new(ColumnId::Warp, "", 24),
];

/// Snapshot of the runtime flags that decide column visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewContext {
    /// A vessel the player can control is active.
    pub has_controllable_vessel: bool,
    /// The capability gating maneuver columns is unlocked.
    pub capability_unlocked: bool,
    /// The active vessel is landed.
    pub is_landed: bool,
}

/// Columns shown in `context`, in declaration order.
pub fn visible_columns(context: &ViewContext) -> Vec<&'static ColumnDefinition> {
    visible_columns_of(&COLUMNS, context)
}

/// Filter an arbitrary registry by `context`, preserving its order.
pub fn visible_columns_of<'a>(
    registry: &'a [ColumnDefinition],
    context: &ViewContext,
) -> Vec<&'a ColumnDefinition> {
    registry.iter().filter(|col| col.is_visible(context)).collect()
}

/// Column carrying `key`, if any.
pub fn column_for_key(key: SortKey) -> Option<&'static ColumnDefinition> {
    COLUMNS.iter().find(|col| col.sort_key == Some(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(vessel: bool, unlocked: bool, landed: bool) -> ViewContext {
        ViewContext {
            has_controllable_vessel: vessel,
            capability_unlocked: unlocked,
            is_landed: landed,
        }
    }

    #[test]
    fn vessel_specific_columns_hidden_without_vessel() {
        for unlocked in [false, true] {
            for landed in [false, true] {
                let visible = visible_columns(&ctx(false, unlocked, landed));
                assert!(visible.iter().all(|c| !c.vessel_specific));
                let expected = COLUMNS.iter().filter(|c| !c.vessel_specific).count();
                assert_eq!(visible.len(), expected);
            }
        }
    }

    #[test]
    fn unlock_columns_need_vessel_in_flight() {
        let has_maneuver =
            |c: &ViewContext| visible_columns(c).iter().any(|col| col.id == ColumnId::Maneuver);

        assert!(has_maneuver(&ctx(true, true, false)));
        assert!(!has_maneuver(&ctx(true, true, true)));
        assert!(!has_maneuver(&ctx(true, false, false)));
        assert!(!has_maneuver(&ctx(false, true, false)));
    }

    #[test]
    fn full_context_shows_every_column_in_order() {
        let visible = visible_columns(&ctx(true, true, false));
        let ids: Vec<ColumnId> = visible.iter().map(|c| c.id).collect();
        let all: Vec<ColumnId> = COLUMNS.iter().map(|c| c.id).collect();
        assert_eq!(ids, all);
    }

    #[test]
    fn sort_keys_are_unique() {
        for key in [SortKey::Name, SortKey::Time, SortKey::DeltaV, SortKey::BurnDuration] {
            let n = COLUMNS.iter().filter(|c| c.sort_key == Some(key)).count();
            assert_eq!(n, 1, "{:?}", key);
            assert!(column_for_key(key).is_some());
        }
    }

    #[test]
    fn empty_registry_is_valid() {
        assert!(visible_columns_of(&[], &ctx(true, true, false)).is_empty());
    }
}
