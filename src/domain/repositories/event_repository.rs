//! Repository trait for click events, analytics rows, and retention purges.

use crate::domain::entities::{
    BaseClickEvent, GeoBackfillRow, GeoUpdate, NewBaseClickEvent, NewEnrichedClickEvent,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Typed filter for retention deletes and counts.
///
/// Built from config- and override-derived values and bound as query
/// parameters; values are never interpolated into SQL text.
#[derive(Debug, Clone, Copy)]
pub struct EventPurgeFilter {
    /// Rows strictly older than this instant are affected.
    pub cutoff: DateTime<Utc>,
    /// When set, restricts the purge to links owned by this tenant.
    pub owner_id: Option<i64>,
}

impl EventPurgeFilter {
    pub fn global(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff,
            owner_id: None,
        }
    }

    pub fn for_owner(cutoff: DateTime<Utc>, owner_id: i64) -> Self {
        Self {
            cutoff,
            owner_id: Some(owner_id),
        }
    }
}

/// Repository interface for the two-fidelity event tables.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgEventRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts the minimal base click event. The only analytics write on the
    /// request path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert_base(&self, new_event: NewBaseClickEvent) -> Result<BaseClickEvent, AppError>;

    /// Inserts the detailed analytics row. Called off the request path;
    /// failures are logged by the caller and never retried.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert_enriched(&self, new_event: NewEnrichedClickEvent) -> Result<i64, AppError>;

    /// Fetches up to `limit` analytics rows with a non-null IP and missing
    /// geo fields, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn geo_backfill_candidates(&self, limit: i64) -> Result<Vec<GeoBackfillRow>, AppError>;

    /// Fills geo columns on one analytics row. Only currently-null columns
    /// are written; a concurrent or earlier enrichment is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn apply_geo_update(&self, event_id: i64, update: GeoUpdate) -> Result<(), AppError>;

    /// Deletes base events matching the filter, returning the number of rows
    /// removed. Deleting already-absent rows is a no-op.
    async fn purge_base(&self, filter: EventPurgeFilter) -> Result<u64, AppError>;

    /// Deletes enriched analytics rows matching the filter.
    async fn purge_enriched(&self, filter: EventPurgeFilter) -> Result<u64, AppError>;

    /// Counts base events matching the filter without locking; used for
    /// dry runs, so a best-effort approximation under concurrent writes.
    async fn count_base(&self, filter: EventPurgeFilter) -> Result<u64, AppError>;

    /// Counts enriched analytics rows matching the filter.
    async fn count_enriched(&self, filter: EventPurgeFilter) -> Result<u64, AppError>;
}
