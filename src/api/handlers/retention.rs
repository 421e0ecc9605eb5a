//! Administrative retention trigger.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::json;

use crate::application::services::RetentionReport;
use crate::error::AppError;
use crate::state::AppState;

/// Request body for a retention run.
#[derive(Debug, Default, Deserialize)]
pub struct RetentionRunRequest {
    #[serde(default)]
    pub dry_run: bool,
}

/// Triggers one retention run.
///
/// # Endpoint
///
/// `POST /admin/retention/run`
///
/// With `{"dry_run": true}` the phases run equivalent COUNT queries and
/// nothing is deleted. Scheduling is left to the operator or an external
/// scheduler.
///
/// # Errors
///
/// A failed run returns `500` with the partial report in the error details;
/// deletions made before the failure are not rolled back.
pub async fn retention_run_handler(
    State(state): State<AppState>,
    body: Option<Json<RetentionRunRequest>>,
) -> Result<Json<RetentionReport>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    match state.retention.run(request.dry_run).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!("Retention run failed: {:?}", e.source);
            let partial =
                serde_json::to_value(&e.partial).unwrap_or_else(|_| json!({}));
            Err(AppError::internal(
                "Retention run failed",
                json!({ "partial": partial }),
            ))
        }
    }
}
