use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Failures at the HTTP boundary. Callers only ever see a static message; the upstream
/// cause goes to the log.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Failed to fetch movie details")]
    MovieDetails(anyhow::Error),

    #[error("Failed to fetch recommendations")]
    Recommendations(anyhow::Error),
}

impl AppError {
    fn cause(&self) -> &anyhow::Error {
        match self {
            AppError::MovieDetails(e) | AppError::Recommendations(e) => e,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("{}: {:#}", self, self.cause());
        let body = Json(json!({
            "error": self.to_string()
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
