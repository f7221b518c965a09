use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::MovieDetail;
use crate::tmdb::TmdbApi;

/// Fetches metadata, credits and images concurrently and merges them. Any fragment
/// failing fails the whole record.
pub async fn fetch_direct(tmdb: &dyn TmdbApi, id: u64) -> Result<MovieDetail> {
    let (core, credits, images) =
        tokio::try_join!(tmdb.movie(id), tmdb.credits(id), tmdb.images(id))?;
    MovieDetail::merge(core, credits, images)
}

/// A server that already does the merge, e.g. this crate's own `GET /movie/{id}`.
#[async_trait]
pub trait MovieProxy: Send + Sync {
    async fn movie_detail(&self, id: u64) -> Result<MovieDetail>;
}

#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build proxy HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MovieProxy for ProxyClient {
    async fn movie_detail(&self, id: u64) -> Result<MovieDetail> {
        let url = format!("{}/movie/{id}", self.base_url);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context("proxy request failed")?;
        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("{} -> {}", url, status));
        }
        res.json::<MovieDetail>()
            .await
            .context("proxy JSON parse failed")
    }
}

/// Memo, then the local proxy, then three direct catalog calls.
pub struct DetailAggregator {
    tmdb: Arc<dyn TmdbApi>,
    proxy: Option<Arc<dyn MovieProxy>>,
    memo: HashMap<u64, MovieDetail>,
}

impl DetailAggregator {
    pub fn new(tmdb: Arc<dyn TmdbApi>, proxy: Option<Arc<dyn MovieProxy>>) -> Self {
        Self {
            tmdb,
            proxy,
            memo: HashMap::new(),
        }
    }

    pub async fn get(&mut self, id: u64) -> Result<MovieDetail> {
        if let Some(detail) = self.memo.get(&id) {
            debug!("Detail memo hit for movie {}", id);
            return Ok(detail.clone());
        }

        let proxied = match &self.proxy {
            Some(proxy) => match proxy.movie_detail(id).await {
                Ok(detail) => Some(detail),
                Err(e) => {
                    info!(
                        "Local proxy unavailable for movie {} ({:#}), calling the catalog directly",
                        id, e
                    );
                    None
                }
            },
            None => None,
        };

        let detail = match proxied {
            Some(detail) => detail,
            None => fetch_direct(self.tmdb.as_ref(), id).await?,
        };
        self.memo.insert(id, detail.clone());
        Ok(detail)
    }

    pub fn is_memoized(&self, id: u64) -> bool {
        self.memo.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credits, Images, MovieCore, MovieSummary};
    use serde_json::{json, Map};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FragmentTmdb {
        calls: AtomicUsize,
        fail_credits: bool,
    }

    fn core(id: u64) -> MovieCore {
        serde_json::from_value(json!({
            "id": id,
            "title": "Spirited Away",
            "poster_path": "/39wmItIWsg5sZMyRUHLkWBcuVCM.jpg",
            "backdrop_path": null,
            "vote_average": 8.5,
            "release_date": "2001-07-20",
            "overview": "A young girl wanders into a world ruled by gods.",
            "runtime": 125,
            "genres": [{ "id": 16, "name": "Animation" }],
            "imdb_id": "tt0245429"
        }))
        .unwrap()
    }

    #[async_trait]
    impl TmdbApi for FragmentTmdb {
        async fn top_rated_page(&self, _page: u32) -> Result<Vec<MovieSummary>> {
            unreachable!()
        }
        async fn movie(&self, id: u64) -> Result<MovieCore> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(core(id))
        }
        async fn credits(&self, _id: u64) -> Result<Credits> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_credits {
                return Err(anyhow!("credits -> 500"));
            }
            Ok(Credits::default())
        }
        async fn images(&self, _id: u64) -> Result<Images> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Images::default())
        }
    }

    struct FakeProxy {
        calls: AtomicUsize,
        up: bool,
    }

    #[async_trait]
    impl MovieProxy for FakeProxy {
        async fn movie_detail(&self, id: u64) -> Result<MovieDetail> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.up {
                return Err(anyhow!("connection refused"));
            }
            let mut proxied = core(id);
            proxied.extra = Map::from_iter([("via".to_string(), json!("proxy"))]);
            MovieDetail::merge(proxied, Credits::default(), Images::default())
        }
    }

    #[tokio::test]
    async fn falls_back_to_direct_calls_when_proxy_is_down() {
        let tmdb = Arc::new(FragmentTmdb::default());
        let proxy = Arc::new(FakeProxy {
            calls: AtomicUsize::new(0),
            up: false,
        });
        let mut aggregator = DetailAggregator::new(tmdb.clone(), Some(proxy.clone()));

        let detail = aggregator.get(129).await.unwrap();

        assert_eq!(detail.id(), 129);
        assert!(!detail.core.extra.contains_key("via"));
        assert_eq!(proxy.calls.load(Ordering::SeqCst), 1);
        assert_eq!(tmdb.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn prefers_proxy_and_memoizes() {
        let tmdb = Arc::new(FragmentTmdb::default());
        let proxy = Arc::new(FakeProxy {
            calls: AtomicUsize::new(0),
            up: true,
        });
        let mut aggregator = DetailAggregator::new(tmdb.clone(), Some(proxy.clone()));

        let first = aggregator.get(129).await.unwrap();
        let second = aggregator.get(129).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.core.extra["via"], json!("proxy"));
        assert!(aggregator.is_memoized(129));
        assert_eq!(proxy.calls.load(Ordering::SeqCst), 1);
        assert_eq!(tmdb.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_fragment_is_not_memoized() {
        let tmdb = Arc::new(FragmentTmdb {
            calls: AtomicUsize::new(0),
            fail_credits: true,
        });
        let mut aggregator = DetailAggregator::new(tmdb, None);

        assert!(aggregator.get(129).await.is_err());
        assert!(!aggregator.is_memoized(129));
    }
}
