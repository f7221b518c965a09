//! Run a recommendation session from the terminal.
//! Usage:
//!   cargo run --bin picks -- [rounds]
//!   cargo run --bin picks -- details <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported). PROXY_URL, when set, is
//! tried before the catalog for details.

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reelpick::config::Config;
use reelpick::details::{MovieProxy, ProxyClient};
use reelpick::links::{image_url_opt, ImageSize};
use reelpick::session::Session;
use reelpick::tmdb::{parse_movie_id, TmdbApi, TmdbClient};
use reelpick::view::{CardView, DetailView};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let config = Config::from_env()?;
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    )?);
    let proxy: Option<Arc<dyn MovieProxy>> = match config.proxy_url.as_deref() {
        Some(url) => Some(Arc::new(ProxyClient::new(url)?)),
        None => None,
    };
    let mut session = Session::new(tmdb, proxy, StdRng::from_os_rng());

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("details") => {
            let id = args
                .get(1)
                .and_then(|s| parse_movie_id(s))
                .ok_or_else(|| anyhow!("usage: picks details <tmdb_id>"))?;
            let detail = session
                .open(id)
                .await
                .ok_or_else(|| anyhow!("{}", reelpick::session::DETAIL_ERROR))?;
            let full_poster =
                image_url_opt(ImageSize::Original, detail.core.poster_path.as_deref());
            let view = DetailView::from(detail);
            println!("{}", serde_json::to_string_pretty(&view)?);
            if let Some(url) = full_poster {
                println!("Full-size poster: {url}");
            }
        }
        other => {
            let rounds: usize = match other {
                Some(n) => n.parse().context("rounds must be a number")?,
                None => 1,
            };
            for round in 1..=rounds {
                println!("Round {round}");
                for movie in session.recommend().await? {
                    let card = CardView::from(movie);
                    println!(
                        "  [{}] {} ({}) - {}",
                        card.id,
                        card.title,
                        card.year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string()),
                        card.rating
                    );
                }
            }
            println!("{} movies excluded from the next draw", session.exclusions().len());
        }
    }
    Ok(())
}
