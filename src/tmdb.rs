use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::models::{Credits, Images, MovieCore, MovieSummary};

pub const TMDB_BASE: &str = "https://api.themoviedb.org/3";

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn top_rated_page(&self, page: u32) -> Result<Vec<MovieSummary>>;
    async fn movie(&self, id: u64) -> Result<MovieCore>;
    async fn credits(&self, id: u64) -> Result<Credits>;
    async fn images(&self, id: u64) -> Result<Images>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let user_agent = format!("reelpick/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str, query: &str) -> Result<T> {
        let url = format!("{}{}?{}api_key={}", self.base_url, path, query, self.api_key);
        debug!("GET {}{}", self.base_url, path);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("request to {} failed", path))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| e.without_url())
            .context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {} {}", path, status, text));
        }
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn top_rated_page(&self, page: u32) -> Result<Vec<MovieSummary>> {
        #[derive(Deserialize)]
        struct PageResponse {
            results: Vec<MovieSummary>,
        }

        let data: PageResponse = self
            .get_json(
                "/movie/top_rated",
                &format!("language=en-US&page={page}&"),
            )
            .await
            .with_context(|| format!("top rated page {page}"))?;
        Ok(data.results)
    }

    async fn movie(&self, id: u64) -> Result<MovieCore> {
        self.get_json(&format!("/movie/{id}"), "language=en-US&")
            .await
            .with_context(|| format!("movie {id}"))
    }

    async fn credits(&self, id: u64) -> Result<Credits> {
        self.get_json(&format!("/movie/{id}/credits"), "language=en-US&")
            .await
            .with_context(|| format!("credits for movie {id}"))
    }

    async fn images(&self, id: u64) -> Result<Images> {
        self.get_json(&format!("/movie/{id}/images"), "")
            .await
            .with_context(|| format!("images for movie {id}"))
    }
}

pub fn parse_movie_id(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.parse().ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_ids_only() {
        assert_eq!(parse_movie_id("238"), Some(238));
        assert_eq!(parse_movie_id(" 424 "), Some(424));
        assert_eq!(parse_movie_id("tt0068646"), None);
        assert_eq!(parse_movie_id(""), None);
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let client = TmdbClient::new("key", "http://localhost:9000/3/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9000/3");
    }

    #[tokio::test]
    async fn transport_errors_do_not_carry_the_api_key() {
        // nothing listens on port 1
        let client = TmdbClient::new("secret-key-123", "http://127.0.0.1:1/3").unwrap();
        let err = client.top_rated_page(1).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("/movie/top_rated"), "{message}");
        assert!(!message.contains("secret-key-123"), "{message}");
    }
}
