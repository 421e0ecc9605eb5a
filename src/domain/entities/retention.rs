//! Per-tenant retention override entity.

use sqlx::FromRow;

/// A tenant-specific retention window.
///
/// Only overrides strictly shorter than the global default are honored; an
/// override at or above the default is reported as skipped and never extends
/// retention beyond the global baseline.
#[derive(Debug, Clone, FromRow)]
pub struct RetentionOverride {
    pub owner_id: i64,
    pub retention_days: i32,
}
