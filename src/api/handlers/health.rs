//! Liveness endpoint.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

/// Reports process health.
///
/// # Endpoint
///
/// `GET /health`
///
/// The store is intentionally not pinged here: the redirect path has its own
/// bounded-timeout degradation, and a health probe that flaps with the
/// database would take the cache-served hot path down with it.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "cache_entries": state.cache.len(),
        "geo_worker_running": state.geo_worker.stats().running,
    }))
}
