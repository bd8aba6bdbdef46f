//! Download the published workbook and decode it into grids.

use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use calamine::{Reader, Xlsx};
use tracing::{debug, info};

use crate::config::{xlsx_endpoint, FETCH_TIMEOUT_SECS, PUBLISHED_URL};
use crate::error::{SheetError, SheetResult};
use crate::grid::{Grid, Workbook};
use crate::sheet::GridSource;

/// Fetches the workbook over HTTP and decodes every tab.
///
/// One bounded-timeout GET per call, no retries; retry policy, if ever
/// wanted, belongs in a wrapper, not here.
pub struct SheetFetcher {
    endpoint: String,
    client: reqwest::Client,
}

impl SheetFetcher {
    /// Fetcher for the configured published spreadsheet.
    pub fn new() -> Self {
        Self::with_url(PUBLISHED_URL)
    }

    /// Fetcher for an arbitrary published "view" URL.
    pub fn with_url(published_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("default reqwest client builds");
        Self {
            endpoint: xlsx_endpoint(published_url),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn download(&self) -> SheetResult<Vec<u8>> {
        info!(endpoint = %self.endpoint, "downloading sheet workbook");
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::Upstream {
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for SheetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode xlsx bytes into a workbook, one grid per tab.
pub fn decode_workbook(bytes: Vec<u8>) -> SheetResult<Workbook> {
    let mut xlsx: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| SheetError::Decode(e.to_string()))?;

    let mut tabs = HashMap::new();
    for name in xlsx.sheet_names().to_vec() {
        let range = xlsx
            .worksheet_range(&name)
            .map_err(|e| SheetError::Decode(format!("tab {name}: {e}")))?;
        tabs.insert(name, Grid::from_range(&range));
    }
    debug!(tabs = tabs.len(), "workbook decoded");
    Ok(Workbook::new(tabs))
}

#[async_trait]
impl GridSource for SheetFetcher {
    async fn workbook(&self) -> SheetResult<Workbook> {
        let bytes = self.download().await?;
        decode_workbook(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetcher_targets_the_xlsx_endpoint() {
        let fetcher = SheetFetcher::with_url(
            "https://docs.google.com/spreadsheets/d/e/KEY/pubhtml?widget=true",
        );
        assert_eq!(
            fetcher.endpoint(),
            "https://docs.google.com/spreadsheets/d/e/KEY/pub?output=xlsx"
        );
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let err = decode_workbook(b"definitely not a zip".to_vec()).unwrap_err();
        assert!(matches!(err, SheetError::Decode(_)));
        assert!(!err.is_upstream());
    }
}
