use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the top-rated listing. Fields TMDB sends beyond the ones named here
/// are carried in `extra` so the proxy hands them on unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieSummary {
    pub fn release_year(&self) -> Option<i32> {
        release_year(&self.release_date)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: String,
    pub profile_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImageRef {
    pub file_path: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `movie/{id}` fragment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieCore {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub overview: String,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub imdb_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `movie/{id}/credits` fragment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `movie/{id}/images` fragment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Images {
    #[serde(default)]
    pub backdrops: Vec<ImageRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The merged record served by `GET /movie/{id}`: metadata at the top level, credits
/// and images nested under their own keys.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub core: MovieCore,
    pub credits: Credits,
    pub images: Images,
}

impl MovieDetail {
    /// Fails rather than letting a metadata field shadow one of the nested fragments.
    pub fn merge(core: MovieCore, credits: Credits, images: Images) -> Result<Self> {
        for key in ["credits", "images"] {
            if core.extra.contains_key(key) {
                bail!("metadata for movie {} already carries a `{}` field", core.id, key);
            }
        }
        Ok(Self {
            core,
            credits,
            images,
        })
    }

    pub fn id(&self) -> u64 {
        self.core.id
    }

    pub fn director(&self) -> Option<&CrewMember> {
        self.credits.crew.iter().find(|c| c.job == "Director")
    }

    pub fn main_cast(&self, max: usize) -> &[CastMember] {
        let end = self.credits.cast.len().min(max);
        &self.credits.cast[..end]
    }

    pub fn stills(&self, max: usize) -> &[ImageRef] {
        let end = self.images.backdrops.len().min(max);
        &self.images.backdrops[..end]
    }

    pub fn release_year(&self) -> Option<i32> {
        release_year(&self.core.release_date)
    }
}

fn release_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}
