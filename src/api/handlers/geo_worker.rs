//! Geo enrichment worker control endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::application::services::{BackfillOutcome, GeoWorkerStats};
use crate::error::AppError;
use crate::state::AppState;

/// Starts the worker loop.
///
/// # Endpoint
///
/// `POST /admin/workers/geo/start`
///
/// Returns `409`-style conflict information in the body when the worker is
/// already running (the operation is idempotent from the operator's view).
pub async fn geo_worker_start_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.geo_worker.start() {
        (StatusCode::OK, Json(json!({ "started": true })))
    } else {
        (
            StatusCode::CONFLICT,
            Json(json!({ "started": false, "reason": "already running" })),
        )
    }
}

/// Signals the worker loop to stop after any in-flight batch.
///
/// # Endpoint
///
/// `POST /admin/workers/geo/stop`
pub async fn geo_worker_stop_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.geo_worker.stop() {
        (StatusCode::OK, Json(json!({ "stopped": true })))
    } else {
        (
            StatusCode::CONFLICT,
            Json(json!({ "stopped": false, "reason": "not running" })),
        )
    }
}

/// Reports worker counters.
///
/// # Endpoint
///
/// `GET /admin/workers/geo/stats`
pub async fn geo_worker_stats_handler(State(state): State<AppState>) -> Json<GeoWorkerStats> {
    Json(state.geo_worker.stats())
}

/// Request body for a manual backfill pass.
#[derive(Debug, Default, Deserialize)]
pub struct GeoWorkerRunRequest {
    #[serde(default)]
    pub dry_run: bool,
}

/// Runs a single backfill pass immediately, outside the schedule.
///
/// # Endpoint
///
/// `POST /admin/workers/geo/run`
///
/// With `{"dry_run": true}` the pass scans and looks up but persists
/// nothing; used for operational verification of a new GeoIP database.
pub async fn geo_worker_run_handler(
    State(state): State<AppState>,
    body: Option<Json<GeoWorkerRunRequest>>,
) -> Result<Json<BackfillOutcome>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let outcome = state.geo_worker.run_once(request.dry_run).await?;
    Ok(Json(outcome))
}
