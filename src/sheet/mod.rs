//! Workbook acquisition: fetch, decode, optionally cache.

pub mod cache;
pub mod fetch;

use async_trait::async_trait;

use crate::error::SheetResult;
use crate::grid::Workbook;

/// Anything that can produce a decoded workbook. The route layer only
/// sees this trait, so the fetcher can be wrapped (caching) or replaced
/// (tests) without touching handlers.
#[async_trait]
pub trait GridSource: Send + Sync {
    async fn workbook(&self) -> SheetResult<Workbook>;
}

pub use cache::CachedSource;
pub use fetch::SheetFetcher;
