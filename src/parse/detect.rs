//! Start-row detection: where does asset data begin in an unlabeled grid?
//!
//! Each heuristic is its own detector so strategies can be added, removed
//! and tested independently. Detectors are tried in order; the first hit
//! wins. An exhausted cascade is a soft "no data" signal.

use crate::grid::{Cell, Grid};
use crate::parse::coerce::coerce_numeric;
use crate::parse::schema::NAME_COL;

/// Canonical spelling of the first asset in the sheet.
pub const PRIMARY_MARKERS: &[&str] = &["SP500"];

/// Alternate spellings seen in older sheet revisions.
pub const FALLBACK_MARKERS: &[&str] = &["S&P 500", "S&P500", "SPX"];

/// A single start-row heuristic.
pub trait RowDetector {
    fn locate(&self, grid: &Grid) -> Option<usize>;
}

/// Finds the first row whose name-column text contains one of the marker
/// tokens, case-insensitively.
pub struct MarkerDetector {
    pub markers: &'static [&'static str],
    pub name_col: usize,
}

impl RowDetector for MarkerDetector {
    fn locate(&self, grid: &Grid) -> Option<usize> {
        grid.rows().iter().position(|row| {
            let Some(Cell::Text(s)) = row.get(self.name_col) else {
                return false;
            };
            let name = s.trim().to_lowercase();
            self.markers.iter().any(|m| name.contains(&m.to_lowercase()))
        })
    }
}

/// Finds the first row that merely looks like data: a non-blank textual
/// name followed by at least `min_numeric` numeric-coercible cells.
///
/// Looser than marker matching and so not part of the default cascade;
/// callers that want a last-resort guess can append it explicitly.
pub struct NumericRowDetector {
    pub name_col: usize,
    pub min_numeric: usize,
}

impl RowDetector for NumericRowDetector {
    fn locate(&self, grid: &Grid) -> Option<usize> {
        grid.rows().iter().position(|row| {
            let named = matches!(
                row.get(self.name_col),
                Some(Cell::Text(s)) if !s.trim().is_empty()
            );
            if !named {
                return false;
            }
            let numeric = row
                .iter()
                .skip(self.name_col + 1)
                .filter(|c| coerce_numeric(c).is_some())
                .count();
            numeric >= self.min_numeric
        })
    }
}

/// The default cascade: primary marker, then fallback spellings.
pub fn default_detectors() -> Vec<Box<dyn RowDetector>> {
    vec![
        Box::new(MarkerDetector {
            markers: PRIMARY_MARKERS,
            name_col: NAME_COL,
        }),
        Box::new(MarkerDetector {
            markers: FALLBACK_MARKERS,
            name_col: NAME_COL,
        }),
    ]
}

/// Run a detector cascade; first hit wins.
pub fn locate_with(grid: &Grid, detectors: &[Box<dyn RowDetector>]) -> Option<usize> {
    detectors.iter().find_map(|d| d.locate(grid))
}

/// Locate the asset block start with the default cascade.
pub fn locate_asset_start(grid: &Grid) -> Option<usize> {
    locate_with(grid, &default_detectors())
}
