//! Row projection - turns a transfer model into a table of formatted cells.
//!
//! The header row and every body row have one cell per retained column, so
//! renderers can zip them. A header label spanning several columns is carried
//! by its first column; the covered columns get [`HeaderCell::Continuation`].

pub mod format;

use crate::columns::{ColumnDefinition, ColumnId, SortKey, ViewContext, COLUMNS};
use crate::model::{TransferModel, TransferRecord};
use crate::settings::DisplayUnits;
use crate::sorting::{order_rows, SortState};
use format::{format_delta_v, format_duration, Calendar};

/// Inputs to formatting that come from settings and layout.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionOptions {
    /// Unit system for delta-v.
    pub units: DisplayUnits,
    /// Pixels between adjacent columns.
    pub spacing: u32,
    /// Calendar for time-until-burn.
    pub calendar: Calendar,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            units: DisplayUnits::Metric,
            spacing: 4,
            calendar: Calendar::default(),
        }
    }
}

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderCell {
    /// First column of a header group.
    Head {
        /// Column this cell sits over.
        column: ColumnId,
        /// Label, including any sort indicator.
        label: String,
        /// Width of the whole group in pixels.
        width: u32,
        /// Number of columns in the group.
        span: u32,
        /// Key a click on this header sorts by.
        sort_key: Option<SortKey>,
    },
    /// A column covered by the preceding head's span.
    Continuation {
        /// Column this cell sits over.
        column: ColumnId,
    },
}

impl HeaderCell {
    /// Column under this cell.
    pub fn column(&self) -> ColumnId {
        match self {
            HeaderCell::Head { column, .. } | HeaderCell::Continuation { column } => *column,
        }
    }

    /// Key a click on this cell sorts by; continuations have none.
    pub fn sort_key(&self) -> Option<SortKey> {
        match self {
            HeaderCell::Head { sort_key, .. } => *sort_key,
            HeaderCell::Continuation { .. } => None,
        }
    }

    /// Label text; empty for continuations.
    pub fn label(&self) -> &str {
        match self {
            HeaderCell::Head { label, .. } => label,
            HeaderCell::Continuation { .. } => "",
        }
    }
}

/// Actions offered by button cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// Create maneuver nodes for the transfer.
    CreateManeuver,
    /// Warp to the ejection burn.
    WarpToBurn,
}

/// How a cell should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Plain text.
    Text,
    /// Right-aligned number.
    Numeric,
    /// Warning marker.
    Warning,
    /// Clickable button.
    Button(ButtonKind),
}

/// One body cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Column this cell belongs to.
    pub column: ColumnId,
    /// Display text.
    pub text: String,
    /// Presentation.
    pub kind: CellKind,
    /// Column width in pixels.
    pub width: u32,
}

/// A fully projected table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectedTable {
    /// One cell per retained column.
    pub header_row: Vec<HeaderCell>,
    /// Rows in display order, each aligned with `header_row`.
    pub body_rows: Vec<Vec<Cell>>,
    /// Sort state actually applied to the rows.
    pub effective_sort: SortState,
}

impl ProjectedTable {
    /// Tab-separated rendition, header first.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        let header: Vec<&str> = self.header_row.iter().map(HeaderCell::label).collect();
        out.push_str(&header.join("\t"));
        out.push('\n');
        for row in &self.body_rows {
            let cells: Vec<&str> = row.iter().map(|c| c.text.as_str()).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }
}

/// Project `model` into a table with the standard columns.
pub fn project<M: TransferModel + ?Sized>(
    model: &M,
    context: &ViewContext,
    sort_state: &SortState,
    options: &ProjectionOptions,
) -> ProjectedTable {
    project_records(&COLUMNS, model.transfers(), context, sort_state, options)
}

/// Project `records` through an arbitrary column registry.
pub fn project_records(
    registry: &[ColumnDefinition],
    records: &[TransferRecord],
    context: &ViewContext,
    sort_state: &SortState,
    options: &ProjectionOptions,
) -> ProjectedTable {
    // Spans cover registry successors; hidden members leave the group
    // without handing their slot to a later column.
    let mut retained: Vec<&ColumnDefinition> = Vec::with_capacity(registry.len());
    let mut header_row = Vec::with_capacity(registry.len());
    let mut start = 0;
    while start < registry.len() {
        let head = &registry[start];
        let span = (head.header_col_span.max(1) as usize).min(registry.len() - start);
        let members: Vec<&ColumnDefinition> = registry[start..start + span]
            .iter()
            .filter(|c| c.is_visible(context))
            .collect();
        start += span;

        let Some(first) = members.first() else {
            continue;
        };
        let pixels: u32 = members.iter().map(|c| c.pixel_width).sum();
        if pixels == 0 {
            continue;
        }
        let width = pixels + options.spacing * (members.len() as u32 - 1);
        let head_visible = first.id == head.id;
        header_row.push(HeaderCell::Head {
            column: first.id,
            label: if head_visible { head.header.to_string() } else { String::new() },
            width,
            span: members.len() as u32,
            sort_key: head.sort_key.filter(|_| head_visible),
        });
        header_row.extend(
            members[1..]
                .iter()
                .map(|c| HeaderCell::Continuation { column: c.id }),
        );
        retained.extend_from_slice(&members);
    }

    // A key with no header on screen falls back to source order.
    let effective_sort = match sort_state.active_key {
        Some(key) if header_row.iter().any(|h| h.sort_key() == Some(key)) => *sort_state,
        _ => SortState::default(),
    };

    for cell in &mut header_row {
        if let HeaderCell::Head {
            label,
            sort_key: Some(key),
            ..
        } = cell
        {
            label.push_str(effective_sort.indicator(*key));
        }
    }

    let body_rows = order_rows(records, &effective_sort)
        .into_iter()
        .map(|record| {
            retained
                .iter()
                .map(|col| project_cell(record, col, options))
                .collect()
        })
        .collect();

    ProjectedTable {
        header_row,
        body_rows,
        effective_sort,
    }
}

fn project_cell(record: &TransferRecord, col: &ColumnDefinition, options: &ProjectionOptions) -> Cell {
    let time_part = |index: usize| {
        record
            .time_until_burn
            .map(|t| options.calendar.time_cells(t)[index].clone())
            .unwrap_or_default()
    };
    let button = |kind: ButtonKind, text: &str| {
        if record.time_until_burn.is_some() {
            (text.to_string(), CellKind::Button(kind))
        } else {
            (String::new(), CellKind::Text)
        }
    };

    let (text, kind) = match col.id {
        ColumnId::Destination => (record.destination.clone(), CellKind::Text),
        ColumnId::Years => (time_part(0), CellKind::Numeric),
        ColumnId::Days => (time_part(1), CellKind::Numeric),
        ColumnId::Hours => (time_part(2), CellKind::Numeric),
        ColumnId::Minutes => (time_part(3), CellKind::Numeric),
        ColumnId::Seconds => (time_part(4), CellKind::Numeric),
        ColumnId::DeltaV => (
            record
                .delta_v
                .map(|dv| format_delta_v(dv, options.units))
                .unwrap_or_default(),
            CellKind::Numeric,
        ),
        ColumnId::BurnTime => (
            record.burn_duration.map(format_duration).unwrap_or_default(),
            CellKind::Numeric,
        ),
        ColumnId::Warning => match record.warning {
            Some(_) => ("⚠".to_string(), CellKind::Warning),
            None => (String::new(), CellKind::Text),
        },
        ColumnId::Maneuver => button(ButtonKind::CreateManeuver, "M"),
        ColumnId::Warp => button(ButtonKind::WarpToBurn, "W"),
    };

    Cell {
        column: col.id,
        text,
        kind,
        width: col.pixel_width,
    }
}
