use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::models::MovieSummary;
use crate::tmdb::TmdbApi;

/// Top-rated pages merged into the pool on first use.
pub const POOL_PAGES: [u32; 2] = [1, 2];

/// Lazily populated set of top-rated summaries. Populated once, then reused until
/// [`CatalogPool::clear`]; there is no expiry.
#[derive(Debug, Default)]
pub struct CatalogPool {
    movies: Mutex<Option<Arc<[MovieSummary]>>>,
}

impl CatalogPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pool, fetching both pages concurrently if it is empty. The lock is
    /// held across the fetch so concurrent first callers share one population. A failed
    /// fetch, or one that comes back with no movies, leaves the pool empty.
    pub async fn get_or_populate(&self, tmdb: &dyn TmdbApi) -> Result<Arc<[MovieSummary]>> {
        let mut guard = self.movies.lock().await;
        if let Some(movies) = guard.as_ref().filter(|m| !m.is_empty()) {
            return Ok(movies.clone());
        }

        let (first, second) = tokio::try_join!(
            tmdb.top_rated_page(POOL_PAGES[0]),
            tmdb.top_rated_page(POOL_PAGES[1]),
        )?;
        let movies: Arc<[MovieSummary]> = dedupe(first.into_iter().chain(second)).into();
        if movies.is_empty() {
            warn!("Top-rated pages came back empty, will retry on the next request");
            *guard = None;
        } else {
            info!("Catalog pool populated with {} movies", movies.len());
            *guard = Some(movies.clone());
        }
        Ok(movies)
    }

    pub async fn clear(&self) {
        *self.movies.lock().await = None;
    }

    pub async fn len(&self) -> usize {
        self.movies.lock().await.as_ref().map_or(0, |m| m.len())
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Listing pages can shift between requests, so the same movie may show up on both.
fn dedupe(movies: impl Iterator<Item = MovieSummary>) -> Vec<MovieSummary> {
    let mut seen = HashSet::new();
    movies.filter(|m| seen.insert(m.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credits, Images, MovieCore};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use serde_json::Map;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct PagedTmdb {
        calls: AtomicUsize,
        fail: bool,
        /// Calls before this many return empty pages.
        empty_calls: usize,
    }

    impl PagedTmdb {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
                empty_calls: 0,
            }
        }
    }

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {id}"),
            poster_path: None,
            vote_average: 8.5,
            release_date: "1994-09-23".to_string(),
            extra: Map::new(),
        }
    }

    #[async_trait]
    impl TmdbApi for PagedTmdb {
        async fn top_rated_page(&self, page: u32) -> Result<Vec<MovieSummary>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(anyhow!("upstream down"));
            }
            if call < self.empty_calls {
                return Ok(Vec::new());
            }
            tokio::task::yield_now().await;
            let start = (page as u64 - 1) * 20;
            // page 2 overlaps the tail of page 1
            Ok((start.saturating_sub(1).max(1)..=start + 20).map(movie).collect())
        }
        async fn movie(&self, _id: u64) -> Result<MovieCore> {
            unreachable!()
        }
        async fn credits(&self, _id: u64) -> Result<Credits> {
            unreachable!()
        }
        async fn images(&self, _id: u64) -> Result<Images> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn populates_once_from_two_pages() {
        let tmdb = PagedTmdb::new(false);
        let pool = CatalogPool::new();

        let first = pool.get_or_populate(&tmdb).await.unwrap();
        let second = pool.get_or_populate(&tmdb).await.unwrap();

        assert_eq!(tmdb.calls.load(Ordering::SeqCst), 2);
        assert_eq!(first.len(), 40);
        assert!(Arc::ptr_eq(&first, &second));
        let unique: HashSet<u64> = first.iter().map(|m| m.id).collect();
        assert_eq!(unique.len(), first.len());
    }

    #[tokio::test]
    async fn failed_population_leaves_pool_empty() {
        let tmdb = PagedTmdb::new(true);
        let pool = CatalogPool::new();

        assert!(pool.get_or_populate(&tmdb).await.is_err());
        assert!(pool.is_empty().await);
        let after_first = tmdb.calls.load(Ordering::SeqCst);
        assert!(pool.get_or_populate(&tmdb).await.is_err());
        assert!(tmdb.calls.load(Ordering::SeqCst) > after_first);
    }

    #[tokio::test]
    async fn empty_pages_are_refetched() {
        let tmdb = PagedTmdb {
            empty_calls: 2,
            ..PagedTmdb::new(false)
        };
        let pool = CatalogPool::new();

        let first = pool.get_or_populate(&tmdb).await.unwrap();
        assert!(first.is_empty());
        assert!(pool.is_empty().await);

        let second = pool.get_or_populate(&tmdb).await.unwrap();
        assert_eq!(second.len(), 40);
        assert_eq!(pool.len().await, 40);
        assert_eq!(tmdb.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn concurrent_first_callers_share_one_population() {
        let tmdb = PagedTmdb::new(false);
        let pool = CatalogPool::new();

        let (a, b) = tokio::join!(pool.get_or_populate(&tmdb), pool.get_or_populate(&tmdb));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(tmdb.calls.load(Ordering::SeqCst), 2);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn clear_forces_refetch() {
        let tmdb = PagedTmdb::new(false);
        let pool = CatalogPool::new();
        pool.get_or_populate(&tmdb).await.unwrap();
        pool.clear().await;
        assert!(pool.is_empty().await);
        pool.get_or_populate(&tmdb).await.unwrap();
        assert_eq!(tmdb.calls.load(Ordering::SeqCst), 4);
    }
}
