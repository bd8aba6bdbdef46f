//! TTL snapshot cache as a source decorator.
//!
//! Caching is a wrapping policy, not request-path state: the default
//! server wiring uses the bare fetcher (every request re-fetches), and
//! enabling the cache is one constructor call around any `GridSource`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::SheetResult;
use crate::grid::Workbook;
use crate::sheet::GridSource;

struct Snapshot {
    taken_at: Instant,
    book: Workbook,
}

/// Serves a cached workbook snapshot while it is younger than the TTL,
/// refreshing through the inner source when it expires. Fetch failures
/// are not cached.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    slot: Mutex<Option<Snapshot>>,
}

impl<S> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            slot: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<S: GridSource> GridSource for CachedSource<S> {
    async fn workbook(&self) -> SheetResult<Workbook> {
        let mut slot = self.slot.lock().await;
        if let Some(snap) = slot.as_ref() {
            if snap.taken_at.elapsed() < self.ttl {
                debug!("serving cached workbook snapshot");
                return Ok(snap.book.clone());
            }
        }
        let book = self.inner.workbook().await?;
        *slot = Some(Snapshot {
            taken_at: Instant::now(),
            book: book.clone(),
        });
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl GridSource for CountingSource {
        async fn workbook(&self) -> SheetResult<Workbook> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SheetError::Upstream { status: 502 });
            }
            Ok(Workbook::default())
        }
    }

    #[tokio::test]
    async fn second_hit_within_ttl_does_not_refetch() {
        let cached = CachedSource::new(CountingSource::new(false), Duration::from_secs(60));
        cached.workbook().await.unwrap();
        cached.workbook().await.unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_snapshot_refetches() {
        let cached = CachedSource::new(CountingSource::new(false), Duration::ZERO);
        cached.workbook().await.unwrap();
        cached.workbook().await.unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cached = CachedSource::new(CountingSource::new(true), Duration::from_secs(60));
        assert!(cached.workbook().await.is_err());
        assert!(cached.workbook().await.is_err());
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }
}
