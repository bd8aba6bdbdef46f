//! The cleaned view of the sheet: asset records plus the metadata block.

use serde::{Deserialize, Serialize};

use crate::config::ASSET_TAB;
use crate::grid::{Grid, Workbook};
use crate::parse::coerce::coerce_date;
use crate::parse::detect::locate_asset_start;
use crate::parse::lookup::{find_by_label, LookupValue};
use crate::parse::schema::{map_row, FieldValue, ASSET_SCHEMA, NAME_COL};

/// Rows whose name contains one of these are summary lines, not assets.
const SUMMARY_MARKERS: &[&str] = &["total", "momentum"];

/// Column the metadata labels live in (the asset-name column doubles as
/// the label column for the summary rows below the table).
const META_LABEL_COL: usize = 1;
/// Column the metadata values live in, one right of the labels.
const META_VALUE_COL: usize = 2;
/// Fixed cell the snapshot date is read from: the header cell above the
/// `today` price column.
const TODAY_CELL: (usize, usize) = (0, 13);

/// One cleaned asset row. Field order matches the sheet's 16-column
/// window; nullable fields serialize as JSON null, never NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub asset: String,
    pub index_value: Option<f64>,
    pub intrinsic_value: Option<f64>,
    pub overprice: Option<f64>,
    pub assoc_date: Option<String>,
    pub months_to_even: Option<f64>,
    pub overprice_threshold: Option<f64>,
    pub target_allocation: Option<f64>,
    pub est_growth: Option<f64>,
    pub est_dividends: Option<f64>,
    pub est_total_return: Option<f64>,
    pub previous: Option<f64>,
    pub today: Option<f64>,
    pub change: Option<f64>,
    pub gaussian_estimate: Option<f64>,
    #[serde(default)]
    pub extra: FieldValue,
}

impl AssetRecord {
    /// Build a record from schema-ordered field values. Returns `None`
    /// when the name field is null or blank (the row is not an asset).
    fn from_values(values: &[FieldValue]) -> Option<Self> {
        let asset = values.first()?.as_text()?.to_string();
        let num = |i: usize| values.get(i).and_then(FieldValue::as_number);
        let text = |i: usize| values.get(i).and_then(|v| v.as_text().map(str::to_string));
        Some(Self {
            asset,
            index_value: num(1),
            intrinsic_value: num(2),
            overprice: num(3),
            assoc_date: text(4),
            months_to_even: num(5),
            overprice_threshold: num(6),
            target_allocation: num(7),
            est_growth: num(8),
            est_dividends: num(9),
            est_total_return: num(10),
            previous: num(11),
            today: num(12),
            change: num(13),
            gaussian_estimate: num(14),
            extra: values.get(15).cloned().unwrap_or_default(),
        })
    }
}

/// Scalar snapshot extracted by label lookup (plus one fixed cell).
/// Absent values are omitted from the JSON, not serialized as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implied_allocation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauss_mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauss_sd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today: Option<String>,
}

/// The `/assets` response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetExtract {
    pub meta: MetaBlock,
    pub assets: Vec<AssetRecord>,
}

fn is_summary_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    SUMMARY_MARKERS.iter().any(|m| lower.contains(m))
}

/// Parse the asset block out of a grid.
///
/// The block runs from the detected start row to the end of the grid.
/// Summary rows and rows without a name are dropped; every surviving row
/// maps to exactly one record, in grid order. A grid with no detectable
/// start yields an empty list, never an error.
pub fn parse_assets(grid: &Grid) -> Vec<AssetRecord> {
    let Some(start) = locate_asset_start(grid) else {
        tracing::debug!("no asset start marker found, returning empty set");
        return Vec::new();
    };

    grid.rows()[start..]
        .iter()
        .filter_map(|row| {
            let values = map_row(row, NAME_COL, ASSET_SCHEMA);
            let name = values.first().and_then(FieldValue::as_text)?;
            if is_summary_name(name) {
                return None;
            }
            AssetRecord::from_values(&values)
        })
        .collect()
}

/// Numeric metadata lookup. Percent-suffixed sheet values ("5.2%") arrive
/// here already divided by 100 by numeric coercion; no further scaling is
/// applied.
fn meta_number(grid: &Grid, label: &str) -> Option<f64> {
    find_by_label(grid, label, META_LABEL_COL, META_VALUE_COL)
        .and_then(|v| LookupValue::as_number(&v))
}

/// Build the full `{meta, assets}` extract from a fetched workbook.
///
/// A missing or empty asset tab produces the empty extract, not an error;
/// each metadata key is independently optional.
pub fn extract(book: &Workbook) -> SheetExtract {
    let Some(grid) = book.tab(ASSET_TAB).filter(|g| !g.is_empty()) else {
        tracing::warn!(tab = ASSET_TAB, "asset tab missing or empty");
        return SheetExtract::default();
    };

    let meta = MetaBlock {
        momentum: meta_number(grid, "Momentum"),
        implied_allocation: meta_number(grid, "Implied Allocation"),
        gauss_mean: meta_number(grid, "Gauss Mean"),
        gauss_sd: meta_number(grid, "Gauss SD"),
        today: grid.cell(TODAY_CELL.0, TODAY_CELL.1).and_then(coerce_date),
    };

    SheetExtract {
        meta,
        assets: parse_assets(grid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn asset_row(name: &str, values: &[Cell]) -> Vec<Cell> {
        let mut row = vec![Cell::Empty, Cell::text(name)];
        row.extend_from_slice(values);
        row
    }

    fn table_grid() -> Grid {
        Grid::new(vec![
            vec![Cell::text("IVDAR allocation")],
            vec![Cell::Empty],
            asset_row(
                "SP500",
                &[
                    Cell::Number(5123.4),  // index_value
                    Cell::Number(4800.0),  // intrinsic_value
                    Cell::Number(0.067),   // overprice
                    Cell::text("2024-03-15"),
                    Cell::Number(14.0),    // months_to_even
                ],
            ),
            asset_row("Bonds", &[Cell::text("#N/A"), Cell::Number(100.0)]),
            asset_row("  ", &[Cell::Number(1.0)]),
            asset_row("TOTAL", &[Cell::Number(9999.0)]),
            asset_row("Momentum", &[Cell::text("5.2%")]),
        ])
    }

    #[test]
    fn one_record_per_qualifying_row_in_order() {
        let assets = parse_assets(&table_grid());
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].asset, "SP500");
        assert_eq!(assets[1].asset, "Bonds");
    }

    #[test]
    fn fields_map_by_offset() {
        let assets = parse_assets(&table_grid());
        let sp = &assets[0];
        assert_eq!(sp.index_value, Some(5123.4));
        assert_eq!(sp.intrinsic_value, Some(4800.0));
        assert_eq!(sp.overprice, Some(0.067));
        assert_eq!(sp.assoc_date, Some("2024-03-15T00:00:00".to_string()));
        assert_eq!(sp.months_to_even, Some(14.0));
        // Past the row's width: null, not an error.
        assert_eq!(sp.today, None);
        assert_eq!(sp.extra, FieldValue::Null);
    }

    #[test]
    fn error_cell_nulls_the_field_but_keeps_the_row() {
        let assets = parse_assets(&table_grid());
        let bonds = &assets[1];
        assert_eq!(bonds.index_value, None);
        assert_eq!(bonds.intrinsic_value, Some(100.0));
    }

    #[test]
    fn summary_and_blank_rows_are_dropped() {
        let assets = parse_assets(&table_grid());
        assert!(assets.iter().all(|a| a.asset != "TOTAL"));
        assert!(assets.iter().all(|a| a.asset != "Momentum"));
        assert!(assets.iter().all(|a| !a.asset.trim().is_empty()));
    }

    #[test]
    fn missing_marker_yields_empty() {
        let grid = Grid::new(vec![
            vec![Cell::text("nothing here")],
            asset_row("Gold", &[Cell::Number(1.0)]),
        ]);
        assert_eq!(parse_assets(&grid), Vec::new());
    }

    fn book_with(grid: Grid) -> Workbook {
        let mut tabs = HashMap::new();
        tabs.insert(ASSET_TAB.to_string(), grid);
        Workbook::new(tabs)
    }

    #[test]
    fn extract_builds_meta_and_assets() {
        let mut rows = table_grid().rows().to_vec();
        rows.push(vec![
            Cell::Empty,
            Cell::text("Implied Allocation"),
            Cell::text("60%"),
        ]);
        rows.push(vec![Cell::Empty, Cell::text("Gauss Mean"), Cell::Number(0.21)]);
        // Snapshot date in the fixed header cell (0, 13).
        rows[0] = {
            let mut r = vec![Cell::text("IVDAR allocation")];
            r.resize(13, Cell::Empty);
            r.push(Cell::text("2024-03-15"));
            r
        };
        let out = extract(&book_with(Grid::new(rows)));

        assert_eq!(out.assets.len(), 2);
        assert_eq!(out.meta.momentum, Some(0.052));
        assert_eq!(out.meta.implied_allocation, Some(0.6));
        assert_eq!(out.meta.gauss_mean, Some(0.21));
        assert_eq!(out.meta.gauss_sd, None);
        assert_eq!(out.meta.today, Some("2024-03-15T00:00:00".to_string()));
    }

    #[test]
    fn extract_on_missing_tab_is_empty() {
        let out = extract(&Workbook::default());
        assert_eq!(out, SheetExtract::default());
    }

    #[test]
    fn extract_on_empty_grid_is_empty() {
        let out = extract(&book_with(Grid::default()));
        assert_eq!(out, SheetExtract::default());
    }

    #[test]
    fn null_meta_keys_are_omitted_from_json() {
        let out = extract(&book_with(table_grid()));
        let json = serde_json::to_value(&out.meta).unwrap();
        let obj = json.as_object().unwrap();
        // Momentum row is present in the grid; the other labels are not.
        assert!(obj.contains_key("momentum"));
        assert!(!obj.contains_key("implied_allocation"));
        assert!(!obj.contains_key("gauss_mean"));
        assert!(!obj.contains_key("gauss_sd"));
        assert!(!obj.contains_key("today"));
    }

    #[test]
    fn record_nulls_serialize_as_json_null() {
        let assets = parse_assets(&table_grid());
        let json = serde_json::to_value(&assets[1]).unwrap();
        assert!(json["index_value"].is_null());
        assert!(json["extra"].is_null());
        assert_eq!(json["asset"], "Bonds");
    }
}
