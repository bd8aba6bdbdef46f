//! Startup constants for the one spreadsheet this service knows about.
//!
//! The column layout, tab name and publish URL are a schema in disguise:
//! the service supports exactly one sheet shape, so they are compile-time
//! constants rather than runtime configuration.

use regex::RegexBuilder;

/// Published "view" URL of the source spreadsheet.
pub const PUBLISHED_URL: &str = "https://docs.google.com/spreadsheets/d/e/\
2PACX-1vTJ6fFeLq7YkaLXhDA_VXyCSRkc_X6uXDUvk9P08AGNWUx4Dc6RcBuxYOQMlaKFisJVBMquQBIj7Djl\
/pubhtml?widget=true&headers=false";

/// Advisory Cache-Control max-age on both data endpoints, in seconds.
pub const CACHE_TTL_SECS: u64 = 300;

/// Tab holding the asset table.
pub const ASSET_TAB: &str = "Sheet1";

/// Upstream request timeout, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// Rewrite a published "view" URL into its "download as xlsx" form.
///
/// Google serves the workbook bytes when `/pubhtml...` is replaced with
/// `/pub?output=xlsx`. URLs without a `/pubhtml` segment pass through
/// unchanged.
pub fn xlsx_endpoint(url: &str) -> String {
    let re = RegexBuilder::new(r"/pubhtml.*")
        .case_insensitive(true)
        .build()
        .expect("hardcoded pattern compiles");
    re.replace(url, "/pub?output=xlsx").into_owned()
}
