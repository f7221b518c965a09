//! One visitor's browsing session: pool, exclusion set, detail memo and the fetch state
//! of the card grid and the detail modal. Methods take `&mut self`, so two
//! recommendation fetches can never overlap. Detail fetches can run detached from the
//! session through [`Session::begin_open`].

use anyhow::Result;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::details::{DetailAggregator, MovieProxy};
use crate::fetch_state::{FetchMachine, Ticket};
use crate::models::{MovieDetail, MovieSummary};
use crate::pool::CatalogPool;
use crate::sampler::{self, ExclusionSet, SAMPLE_SIZE};
use crate::tmdb::TmdbApi;

pub const DETAIL_ERROR: &str = "Failed to load movie details.";
pub const RECOMMENDATION_ERROR: &str = "Failed to fetch recommendations.";

pub struct Session {
    tmdb: Arc<dyn TmdbApi>,
    pool: CatalogPool,
    exclusions: ExclusionSet,
    rng: StdRng,
    details: Arc<Mutex<DetailAggregator>>,
    shown: Vec<MovieSummary>,
    recommendations: FetchMachine<()>,
    modal: FetchMachine<MovieDetail>,
    selected: Option<u64>,
}

impl Session {
    pub fn new(tmdb: Arc<dyn TmdbApi>, proxy: Option<Arc<dyn MovieProxy>>, rng: StdRng) -> Self {
        Self {
            details: Arc::new(Mutex::new(DetailAggregator::new(tmdb.clone(), proxy))),
            tmdb,
            pool: CatalogPool::new(),
            exclusions: ExclusionSet::new(),
            rng,
            shown: Vec::new(),
            recommendations: FetchMachine::new(),
            modal: FetchMachine::new(),
            selected: None,
        }
    }

    /// Draws the next three cards. On failure the previous cards stay on screen and the
    /// grid's state becomes `Error`.
    pub async fn recommend(&mut self) -> Result<&[MovieSummary]> {
        let ticket = self.recommendations.begin();
        let pool = match self.pool.get_or_populate(self.tmdb.as_ref()).await {
            Ok(pool) => pool,
            Err(e) => {
                error!("Error fetching recommendations: {:#}", e);
                self.recommendations.fail(ticket, RECOMMENDATION_ERROR);
                return Err(e);
            }
        };

        let exclusions = std::mem::take(&mut self.exclusions);
        let draw = sampler::sample(&pool, exclusions, SAMPLE_SIZE, &mut self.rng);
        if draw.reset {
            info!("Every top-rated movie has been shown, starting over");
        }
        self.exclusions = draw.exclusions;
        self.shown = draw.chosen;
        self.recommendations.resolve(ticket, ());
        Ok(&self.shown)
    }

    /// Opens the detail modal for `id`. Errors are folded into the modal's state; no
    /// partial record is ever shown.
    pub async fn open(&mut self, id: u64) -> Option<&MovieDetail> {
        let outcome = self.begin_open(id).fetch().await;
        self.finish_open(outcome)
    }

    /// Puts the modal into loading for `id` and returns the fetch to run. The session
    /// is free again as soon as this returns.
    pub fn begin_open(&mut self, id: u64) -> PendingDetail {
        self.selected = Some(id);
        PendingDetail {
            id,
            ticket: self.modal.begin(),
            details: self.details.clone(),
        }
    }

    /// Applies a finished detail fetch. Results for a modal that has since been closed
    /// or pointed at another movie are dropped.
    pub fn finish_open(&mut self, outcome: DetailOutcome) -> Option<&MovieDetail> {
        let DetailOutcome { id, ticket, result } = outcome;
        match result {
            Ok(detail) => {
                if !self.modal.resolve(ticket, detail) {
                    debug!("Dropped details for movie {}, modal moved on", id);
                }
            }
            Err(e) => {
                if self.modal.fail(ticket, DETAIL_ERROR) {
                    error!("Error fetching movie details: {:#}", e);
                }
            }
        }
        self.modal.value()
    }

    pub fn close(&mut self) {
        self.selected = None;
        self.modal.dismiss();
    }

    /// Forgets the pool and everything shown so far. The next [`Session::recommend`]
    /// refetches the top-rated pages; the current cards stay until it succeeds.
    pub async fn start_over(&mut self) {
        self.pool.clear().await;
        self.exclusions.clear();
    }

    pub fn shown(&self) -> &[MovieSummary] {
        &self.shown
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn selected(&self) -> Option<u64> {
        self.selected
    }

    pub fn recommendations_state(&self) -> &FetchMachine<()> {
        &self.recommendations
    }

    pub fn modal_state(&self) -> &FetchMachine<MovieDetail> {
        &self.modal
    }

    /// The poster wall darkens while cards are up or on their way.
    pub fn backdrop_dimmed(&self) -> bool {
        !self.shown.is_empty() || self.recommendations.is_loading()
    }
}

/// A detail fetch detached from the [`Session`] that started it.
pub struct PendingDetail {
    id: u64,
    ticket: Ticket,
    details: Arc<Mutex<DetailAggregator>>,
}

impl PendingDetail {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub async fn fetch(self) -> DetailOutcome {
        let result = self.details.lock().await.get(self.id).await;
        DetailOutcome {
            id: self.id,
            ticket: self.ticket,
            result,
        }
    }
}

/// Result of a [`PendingDetail`], handed back to [`Session::finish_open`].
pub struct DetailOutcome {
    id: u64,
    ticket: Ticket,
    result: Result<MovieDetail>,
}
