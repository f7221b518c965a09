use crate::background::{poster_columns, PosterColumn};
use crate::config::Config;
use crate::details;
use crate::error::{AppError, AppResult};
use crate::models::{MovieDetail, MovieSummary};
use crate::pool::CatalogPool;
use crate::sampler::{self, ExclusionSet, SAMPLE_SIZE};
use crate::tmdb::{TmdbApi, TmdbClient};
use anyhow::Result;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

const MAX_BODY_BYTES: usize = 64 * 1024; // exclusion lists are small

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub pool: Arc<CatalogPool>,
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(tmdb: Arc<dyn TmdbApi>, rng: StdRng) -> Self {
        Self {
            tmdb,
            pool: Arc::new(CatalogPool::new()),
            rng: Arc::new(Mutex::new(rng)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub exclude_ids: Vec<u64>,
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    )?);
    info!("Using catalog API at {}", config.tmdb_api_url);

    let state = AppState::new(tmdb, StdRng::from_os_rng());
    let app = build_router(state);

    let addr = config.listen_addr()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/movie/:id", get(movie_detail))
        .route("/recommendations", get(recommend_unfiltered).post(recommend))
        .route("/background", get(background))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn background() -> Json<Vec<PosterColumn>> {
    Json(poster_columns())
}

async fn movie_detail(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<MovieDetail>> {
    let detail = details::fetch_direct(state.tmdb.as_ref(), id)
        .await
        .map_err(AppError::MovieDetails)?;
    info!("Served details for '{}' ({})", detail.core.title, id);
    Ok(Json(detail))
}

async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let exclusions: ExclusionSet = request.exclude_ids.into_iter().collect();
    draw_recommendations(&state, exclusions).await.map(Json)
}

/// Older clients call this without an exclusion list.
async fn recommend_unfiltered(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    draw_recommendations(&state, ExclusionSet::new()).await.map(Json)
}

async fn draw_recommendations(
    state: &AppState,
    exclusions: ExclusionSet,
) -> AppResult<Vec<MovieSummary>> {
    let pool = state
        .pool
        .get_or_populate(state.tmdb.as_ref())
        .await
        .map_err(AppError::Recommendations)?;

    let excluded = exclusions.len();
    let draw = {
        let mut rng = state.rng.lock().await;
        sampler::sample(&pool, exclusions, SAMPLE_SIZE, &mut *rng)
    };
    if draw.reset {
        debug!(
            "Exclusion list of {} left fewer than {} candidates, drew from the full pool",
            excluded, SAMPLE_SIZE
        );
    }
    info!(
        "Recommended {:?}",
        draw.chosen.iter().map(|m| m.id).collect::<Vec<_>>()
    );
    Ok(draw.chosen)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
