//! What a card or the detail modal shows, computed from catalog records.

use serde::Serialize;

use crate::links::{image_url, image_url_opt, watch_links, ImageSize, WatchLink};
use crate::models::{MovieDetail, MovieSummary};

const MAIN_CAST: usize = 5;
const STILLS: usize = 4;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardView {
    pub id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    pub rating: String,
    pub year: Option<i32>,
}

impl From<&MovieSummary> for CardView {
    fn from(movie: &MovieSummary) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: image_url_opt(ImageSize::W500, movie.poster_path.as_deref()),
            rating: format_rating(movie.vote_average),
            year: movie.release_year(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CastView {
    pub name: String,
    pub character: String,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailView {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub rating: String,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    pub overview: String,
    pub director: Option<String>,
    pub cast: Vec<CastView>,
    pub stills: Vec<String>,
    pub backdrop_url: Option<String>,
    pub poster_url: Option<String>,
    pub watch_links: Vec<WatchLink>,
}

impl From<&MovieDetail> for DetailView {
    fn from(movie: &MovieDetail) -> Self {
        let core = &movie.core;
        Self {
            id: core.id,
            title: core.title.clone(),
            year: movie.release_year(),
            rating: format_rating(core.vote_average),
            runtime_minutes: core.runtime,
            genres: core.genres.iter().map(|g| g.name.clone()).collect(),
            overview: core.overview.clone(),
            director: movie.director().map(|d| d.name.clone()),
            cast: movie
                .main_cast(MAIN_CAST)
                .iter()
                .map(|c| CastView {
                    name: c.name.clone(),
                    character: c.character.clone(),
                    profile_url: image_url_opt(ImageSize::W200, c.profile_path.as_deref()),
                })
                .collect(),
            stills: movie
                .stills(STILLS)
                .iter()
                .map(|i| image_url(ImageSize::W780, &i.file_path))
                .collect(),
            backdrop_url: image_url_opt(ImageSize::W1280, core.backdrop_path.as_deref()),
            poster_url: image_url_opt(ImageSize::W500, core.poster_path.as_deref()),
            watch_links: watch_links(&core.title, core.imdb_id.as_deref()),
        }
    }
}

fn format_rating(vote_average: f64) -> String {
    format!("{vote_average:.1}")
}
