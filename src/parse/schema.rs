//! The one known sheet shape, written down once.
//!
//! The source spreadsheet has no named headers; its schema is a set of
//! fixed column offsets. This module is the single place that knows them:
//! an ordered list of `{name, offset, kind}` descriptors consumed by one
//! generic row mapper. Changing the sheet layout means editing this table,
//! nothing else.

use serde::{Deserialize, Serialize};

use crate::grid::Cell;
use crate::parse::coerce::{coerce_date, coerce_numeric, has_percent_suffix};

/// Grid column holding asset names. The 16-column field window starts here.
pub const NAME_COL: usize = 1;

/// How a window column is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Finite number, stored as-is.
    Number,
    /// Finite number from a column that stores percents as whole numbers:
    /// plain `7.5` means 7.5% and is divided by 100. Values with an
    /// explicit `%` suffix were already divided during numeric coercion
    /// and are not divided twice.
    Percent,
    /// ISO-8601 date-time string.
    Date,
    /// Trimmed non-empty string.
    Text,
    /// Number if the cell coerces, else the raw trimmed string.
    Any,
}

/// One column of the asset window.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Offset from the window base column (the name column is offset 0).
    pub offset: usize,
    pub kind: Coercion,
}

const fn field(name: &'static str, offset: usize, kind: Coercion) -> FieldSpec {
    FieldSpec { name, offset, kind }
}

/// The fixed 16-column asset window, in output order.
///
/// Percent-like columns (overprice, target_allocation, growth/dividend
/// estimates) are `Number`, not `Percent`: the live sheet stores them as
/// fractions already. Flipping one to `Percent` is the documented way to
/// adapt if the sheet ever changes convention.
pub const ASSET_SCHEMA: &[FieldSpec] = &[
    field("asset", 0, Coercion::Text),
    field("index_value", 1, Coercion::Number),
    field("intrinsic_value", 2, Coercion::Number),
    field("overprice", 3, Coercion::Number),
    field("assoc_date", 4, Coercion::Date),
    field("months_to_even", 5, Coercion::Number),
    field("overprice_threshold", 6, Coercion::Number),
    field("target_allocation", 7, Coercion::Number),
    field("est_growth", 8, Coercion::Number),
    field("est_dividends", 9, Coercion::Number),
    field("est_total_return", 10, Coercion::Number),
    field("previous", 11, Coercion::Number),
    field("today", 12, Coercion::Number),
    field("change", 13, Coercion::Number),
    field("gaussian_estimate", 14, Coercion::Number),
    field("extra", 15, Coercion::Any),
];

/// A coerced, serialization-safe field value. Serializes as a bare JSON
/// number, string or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    #[default]
    Null,
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Apply one coercion kind to one cell.
fn coerce_field(kind: Coercion, cell: &Cell) -> FieldValue {
    match kind {
        Coercion::Number => coerce_numeric(cell).map_or(FieldValue::Null, FieldValue::Number),
        Coercion::Percent => coerce_numeric(cell)
            .map(|n| if has_percent_suffix(cell) { n } else { n / 100.0 })
            .map_or(FieldValue::Null, FieldValue::Number),
        Coercion::Date => coerce_date(cell).map_or(FieldValue::Null, FieldValue::Text),
        Coercion::Text => match cell {
            Cell::Text(s) if !s.trim().is_empty() => FieldValue::Text(s.trim().to_string()),
            Cell::Number(n) if n.is_finite() => FieldValue::Text(n.to_string()),
            _ => FieldValue::Null,
        },
        Coercion::Any => match coerce_numeric(cell) {
            Some(n) => FieldValue::Number(n),
            None => match cell {
                Cell::Text(s) if !s.trim().is_empty() => FieldValue::Text(s.trim().to_string()),
                _ => FieldValue::Null,
            },
        },
    }
}

/// Map one grid row through the schema, one value per field in schema
/// order. Columns past the row's width coerce to null: short grids lose
/// fields, they never fail.
pub fn map_row(row: &[Cell], base_col: usize, schema: &[FieldSpec]) -> Vec<FieldValue> {
    schema
        .iter()
        .map(|spec| match row.get(base_col + spec.offset) {
            Some(cell) => coerce_field(spec.kind, cell),
            None => FieldValue::Null,
        })
        .collect()
}
