//! IVDAR Sheet API: a read-only JSON bridge over one published
//! spreadsheet.
//!
//! The service downloads the published workbook, decodes the asset tab
//! into an untyped grid and parses it into chart-ready records. The
//! interesting part is [`parse`]: start-row detection over an unlabeled
//! grid, fixed-offset field mapping and soft-failing cell coercion.
//! Fetching ([`sheet`]) and routing ([`api`]) are thin plumbing around it.
//!
//! # Example
//!
//! ```no_run
//! use ivdar_sheet_api::parse::extract;
//! use ivdar_sheet_api::sheet::{GridSource, SheetFetcher};
//!
//! # async fn demo() -> ivdar_sheet_api::error::SheetResult<()> {
//! let book = SheetFetcher::new().workbook().await?;
//! let out = extract(&book);
//! println!("{} assets", out.assets.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod grid;
pub mod parse;
pub mod sheet;

// Re-export commonly used types
pub use error::{SheetError, SheetResult};
pub use grid::{Cell, Grid, Workbook};
pub use parse::{AssetRecord, MetaBlock, SheetExtract};
