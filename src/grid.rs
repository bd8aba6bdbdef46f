//! Raw workbook model: untyped cells, positional grids, one grid per tab.
//!
//! Nothing here interprets content. Coercion and field naming live in
//! [`crate::parse`]; this module only carries what calamine decoded.

use std::collections::HashMap;

use calamine::Data;
use serde_json::{Map, Value};

/// One spreadsheet cell, as decoded. No header semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Empty,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Value for the raw `/data` dump. Blank cells dump as `""` and
    /// non-finite numbers as `null` so the output is always valid JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Number(n) if n.is_finite() => {
                serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number)
            }
            Cell::Number(_) => Value::Null,
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Empty => Value::String(String::new()),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::Text(s.clone()),
            Data::Bool(b) => Cell::Bool(*b),
            // Serial form so date coercion can pick it up downstream.
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            // Error cells keep their token text ("#DIV/0!" etc.) so the
            // coercion layer can recognize and null them.
            Data::Error(e) => Cell::Text(e.to_string()),
            Data::Empty => Cell::Empty,
        }
    }
}

/// One tab: ordered rows of ordered cells. Indices are positional and
/// stable within a single fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn from_range(range: &calamine::Range<Data>) -> Self {
        let rows = range
            .rows()
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, col), or None when either index is out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Raw row dump: one JSON object per row, keyed by stringified column
    /// index. This is the `/data` debugging shape.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(col, cell)| (col.to_string(), cell.to_json()))
                    .collect()
            })
            .collect()
    }
}

/// A decoded workbook: tab name → grid. Rebuilt on every fetch, never
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    tabs: HashMap<String, Grid>,
}

impl Workbook {
    pub fn new(tabs: HashMap<String, Grid>) -> Self {
        Self { tabs }
    }

    pub fn tab(&self, name: &str) -> Option<&Grid> {
        self.tabs.get(name)
    }

    pub fn tab_names(&self) -> impl Iterator<Item = &str> {
        self.tabs.keys().map(String::as_str)
    }
}
