//! Sort engine - header-click state machine and stable row ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::columns::SortKey;

/// Current sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    /// Key rows are ordered by; `None` keeps source order.
    pub active_key: Option<SortKey>,
    /// Order from largest to smallest.
    pub descending: bool,
}

impl SortState {
    /// Sort ascending by `key`.
    pub fn ascending(key: SortKey) -> Self {
        Self {
            active_key: Some(key),
            descending: false,
        }
    }

    /// Indicator suffix for the header of `key`.
    pub fn indicator(&self, key: SortKey) -> &'static str {
        match self.active_key {
            Some(active) if active == key && self.descending => " ▼",
            Some(active) if active == key => " ▲",
            _ => "",
        }
    }
}

/// A value extracted from a row for ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    /// Numeric value (delta-v, seconds).
    Number(f64),
    /// Text value (names).
    Text(&'a str),
    /// The row has no value for this key.
    Missing,
}

impl SortValue<'_> {
    /// Compare two present values. Text compares case-insensitively first.
    fn cmp_present(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

/// A row that can be ordered by any [`SortKey`].
pub trait RowRecord {
    /// Value of this row for `key`.
    fn sort_value(&self, key: SortKey) -> SortValue<'_>;
}

/// Next sort state after the header for `clicked` is clicked.
///
/// Clicking the active key flips the direction; clicking another key makes it
/// active in ascending order.
pub fn toggle(current: SortState, clicked: SortKey) -> SortState {
    if current.active_key == Some(clicked) {
        SortState {
            active_key: Some(clicked),
            descending: !current.descending,
        }
    } else {
        SortState::ascending(clicked)
    }
}

/// Rows in the order selected by `state`.
///
/// The sort is stable in both directions: descending reverses the comparator,
/// not the list, so equal values keep their source order. Missing values
/// always come last.
pub fn order_rows<'a, R: RowRecord>(rows: &'a [R], state: &SortState) -> Vec<&'a R> {
    let mut ordered: Vec<&R> = rows.iter().collect();
    let Some(key) = state.active_key else {
        return ordered;
    };
    let descending = state.descending;

    ordered.sort_by(|a, b| {
        let (va, vb) = (a.sort_value(key), b.sort_value(key));
        match (&va, &vb) {
            (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
            (SortValue::Missing, _) => Ordering::Greater,
            (_, SortValue::Missing) => Ordering::Less,
            _ if descending => va.cmp_present(&vb).reverse(),
            _ => va.cmp_present(&vb),
        }
    });
    ordered
}
