//! Administrative route configuration.
//!
//! Authentication for these endpoints is out of scope for this service; a
//! deployment is expected to restrict `/admin` behind its own proxy layer.

use crate::api::handlers::{
    geo_worker_run_handler, geo_worker_start_handler, geo_worker_stats_handler,
    geo_worker_stop_handler, retention_run_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Administrative routes.
///
/// # Endpoints
///
/// - `POST /retention/run`      - Trigger a retention run (`dry_run` supported)
/// - `POST /workers/geo/start`  - Start the geo enrichment worker
/// - `POST /workers/geo/stop`   - Stop the geo enrichment worker
/// - `GET  /workers/geo/stats`  - Worker counters
/// - `POST /workers/geo/run`    - Run one backfill pass now (`dry_run` supported)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/retention/run", post(retention_run_handler))
        .route("/workers/geo/start", post(geo_worker_start_handler))
        .route("/workers/geo/stop", post(geo_worker_stop_handler))
        .route("/workers/geo/stats", get(geo_worker_stats_handler))
        .route("/workers/geo/run", post(geo_worker_run_handler))
}
