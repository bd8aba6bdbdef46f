//! Label lookup: find a scalar by scanning a label column.

use crate::grid::{Cell, Grid};
use crate::parse::coerce::coerce_numeric;

/// Value found next to a label. Numeric when the cell coerces, otherwise
/// the raw trimmed text (a date stored as text, for instance).
#[derive(Debug, Clone, PartialEq)]
pub enum LookupValue {
    Number(f64),
    Text(String),
}

impl LookupValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LookupValue::Number(n) => Some(*n),
            LookupValue::Text(_) => None,
        }
    }
}

/// Scan rows top to bottom for the first whose cell at `label_col` matches
/// `label` (trimmed, case-insensitive), then coerce the cell at `value_col`
/// in that row.
///
/// Missing label, out-of-range columns and uncoercible blank values all
/// yield `None`; this lookup never fails hard.
pub fn find_by_label(
    grid: &Grid,
    label: &str,
    label_col: usize,
    value_col: usize,
) -> Option<LookupValue> {
    let wanted = label.trim();
    let row = grid.rows().iter().find(|row| {
        matches!(
            row.get(label_col),
            Some(Cell::Text(s)) if s.trim().eq_ignore_ascii_case(wanted)
        )
    })?;

    let cell = row.get(value_col)?;
    if let Some(n) = coerce_numeric(cell) {
        return Some(LookupValue::Number(n));
    }
    match cell {
        Cell::Text(s) if !s.trim().is_empty() => Some(LookupValue::Text(s.trim().to_string())),
        _ => None,
    }
}
