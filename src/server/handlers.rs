//! HTTP request handlers for the web server.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::AppState;
use crate::services::export::{self, ExportError};

/// Target record count when a caller does not pass one.
const DEFAULT_TARGET: usize = 10;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Parameters for submitting a crawl.
#[derive(Debug, Deserialize)]
pub struct SubmitParams {
    /// How many of the latest tenders to extract.
    pub max: Option<usize>,
}

/// Start a crawl job; responds immediately with its id.
pub async fn submit_crawl(
    State(state): State<AppState>,
    Query(params): Query<SubmitParams>,
) -> impl IntoResponse {
    let target = params.max.unwrap_or(DEFAULT_TARGET);
    let output = state.settings.output_path.clone();
    let job_id = state.controller.submit(target, output).await;
    info!("crawl job {job_id} started, target {target}");

    Json(serde_json::json!({
        "job_id": job_id,
        "status": "started",
    }))
}

/// Report a job's current status. Safe to poll; never blocks on the
/// job finishing.
pub async fn crawl_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let job = state.controller.status(&job_id).await;
    Json(serde_json::json!({
        "job_id": job.id,
        "status": job.status,
        "result": job.result,
        "error": job.error,
    }))
}

/// Serve the current tender table as JSON rows.
pub async fn list_tenders(State(state): State<AppState>) -> impl IntoResponse {
    match export::read_csv(&state.settings.output_path) {
        Ok(rows) => {
            info!("serving {} tender rows", rows.len());
            Json(rows).into_response()
        }
        Err(err @ ExportError::NotFound(_)) => {
            warn!("tender table requested before any crawl wrote it: {err}");
            (StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to read tender table: {err}"),
        )
            .into_response(),
    }
}
