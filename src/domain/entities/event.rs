//! Click event entities at two fidelities.
//!
//! [`BaseClickEvent`] is the minimal synchronous audit record; it is written
//! exactly once per successful resolution and never updated.
//! [`EnrichedClickEvent`] is the detailed best-effort analytics row, written
//! asynchronously and mutated exactly once when geo fields are backfilled.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Minimal durable proof that a redirect occurred.
#[derive(Debug, Clone, FromRow)]
pub struct BaseClickEvent {
    pub id: i64,
    pub short_link_id: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Input for the synchronous base-event insert.
#[derive(Debug, Clone)]
pub struct NewBaseClickEvent {
    pub short_link_id: i64,
}

/// Detailed analytics record derived from request context.
///
/// May legitimately be absent for a given base event: the asynchronous write
/// is tolerated to fail and is never retried. Geo fields stay null until the
/// enrichment worker fills them.
#[derive(Debug, Clone, FromRow)]
pub struct EnrichedClickEvent {
    pub id: i64,
    /// Weak back-reference to the base event (lookup only, not ownership).
    pub base_event_id: Option<i64>,
    pub short_link_id: i64,
    pub occurred_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub operating_system: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Input for the asynchronous enriched-event insert.
#[derive(Debug, Clone)]
pub struct NewEnrichedClickEvent {
    pub base_event_id: Option<i64>,
    pub short_link_id: i64,
    pub occurred_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub operating_system: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

/// Candidate row for geo backfill: an enriched event with an IP but missing
/// geo fields.
#[derive(Debug, Clone, FromRow)]
pub struct GeoBackfillRow {
    pub id: i64,
    pub ip_address: String,
}

/// Geo fields written by the enrichment worker.
///
/// Applied with fill-only-null semantics: a non-null column already present
/// on the row is never overwritten.
#[derive(Debug, Clone, Default)]
pub struct GeoUpdate {
    pub country: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
