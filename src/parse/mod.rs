//! Tab-to-structured-data parsing.
//!
//! Layered leaf-first: cell coercion, label lookup and start detection are
//! small independent utilities; the asset parser and extractor compose
//! them over the fixed sheet schema.

pub mod assets;
pub mod coerce;
pub mod detect;
pub mod lookup;
pub mod schema;

pub use assets::{extract, parse_assets, AssetRecord, MetaBlock, SheetExtract};
pub use coerce::{coerce_date, coerce_numeric};
pub use lookup::{find_by_label, LookupValue};
