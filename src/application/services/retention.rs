//! Retention lifecycle manager.
//!
//! Bounds event-table growth under a mix of global and per-tenant policies.
//! A run is a two-phase pass: tenant overrides strictly shorter than the
//! global window first, then the global baseline across all tenants. Runs
//! are idempotent and keep no state between invocations. A failure partway
//! through aborts the run; rows already deleted for earlier tenants stay
//! deleted — at-least-once deletion, not all-or-nothing.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::repositories::{EventPurgeFilter, EventRepository, RetentionRepository};
use crate::error::AppError;
use crate::utils::clock::Clock;

/// Affected-row counts for one purge scope.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PhaseCounts {
    pub base_events: u64,
    pub enriched_events: u64,
}

impl PhaseCounts {
    fn total(&self) -> u64 {
        self.base_events + self.enriched_events
    }
}

/// Result of one honored tenant override.
#[derive(Debug, Clone, Serialize)]
pub struct TenantPhaseResult {
    pub owner_id: i64,
    pub retention_days: i32,
    pub cutoff: DateTime<Utc>,
    pub counts: PhaseCounts,
}

/// A tenant whose override was not stricter than the global baseline.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedTenant {
    pub owner_id: i64,
    pub retention_days: i32,
}

/// Result of the global baseline phase.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalPhaseResult {
    pub cutoff: DateTime<Utc>,
    pub counts: PhaseCounts,
}

/// Structured report returned by a retention run.
///
/// In dry-run mode the same shape is returned with best-effort counts and
/// zero side effects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetentionReport {
    /// True when no global retention is configured and the run was a no-op.
    pub skipped: bool,
    pub dry_run: bool,
    pub tenant_phase: Vec<TenantPhaseResult>,
    pub global_phase: Option<GlobalPhaseResult>,
    pub skipped_tenants: Vec<SkippedTenant>,
    pub total_affected: u64,
}

/// A failed run, carrying whatever progress was made before the failure.
#[derive(Debug)]
pub struct RetentionError {
    pub partial: RetentionReport,
    pub source: AppError,
}

/// Two-phase event purge under global and per-tenant policies.
pub struct RetentionService {
    events: Arc<dyn EventRepository>,
    overrides: Arc<dyn RetentionRepository>,
    global_days: u32,
    clock: Arc<dyn Clock>,
}

impl RetentionService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        overrides: Arc<dyn RetentionRepository>,
        global_days: u32,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            events,
            overrides,
            global_days,
            clock,
        }
    }

    /// Executes one retention run.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError`] with the partial report when any store
    /// operation fails; earlier deletions in the same run are not rolled
    /// back.
    pub async fn run(&self, dry_run: bool) -> Result<RetentionReport, RetentionError> {
        let mut report = RetentionReport {
            dry_run,
            ..RetentionReport::default()
        };

        if self.global_days == 0 {
            report.skipped = true;
            tracing::info!("Retention not configured, run skipped");
            return Ok(report);
        }

        let now = self.clock.now();

        let overrides = match self.overrides.list_overrides().await {
            Ok(overrides) => overrides,
            Err(source) => {
                return Err(RetentionError {
                    partial: report,
                    source,
                });
            }
        };

        // Phase A: tenants with a strictly shorter window than the baseline.
        for o in overrides {
            if i64::from(o.retention_days) >= i64::from(self.global_days) {
                report.skipped_tenants.push(SkippedTenant {
                    owner_id: o.owner_id,
                    retention_days: o.retention_days,
                });
                continue;
            }

            let cutoff = now - Duration::days(i64::from(o.retention_days));
            let filter = EventPurgeFilter::for_owner(cutoff, o.owner_id);

            let counts = match self.purge(filter, dry_run).await {
                Ok(counts) => counts,
                Err(source) => {
                    return Err(RetentionError {
                        partial: report,
                        source,
                    });
                }
            };

            report.total_affected += counts.total();
            report.tenant_phase.push(TenantPhaseResult {
                owner_id: o.owner_id,
                retention_days: o.retention_days,
                cutoff,
                counts,
            });
        }

        // Phase B: global baseline across all tenants. Rows already removed
        // in Phase A are implicitly excluded; deletion is idempotent.
        let cutoff = now - Duration::days(i64::from(self.global_days));
        let counts = match self.purge(EventPurgeFilter::global(cutoff), dry_run).await {
            Ok(counts) => counts,
            Err(source) => {
                return Err(RetentionError {
                    partial: report,
                    source,
                });
            }
        };

        report.total_affected += counts.total();
        report.global_phase = Some(GlobalPhaseResult { cutoff, counts });

        tracing::info!(
            dry_run,
            total_affected = report.total_affected,
            tenants = report.tenant_phase.len(),
            skipped_tenants = report.skipped_tenants.len(),
            "Retention run finished"
        );

        Ok(report)
    }

    /// Enriched rows go first so a failure between the two deletes never
    /// leaves analytics rows whose base events are already gone.
    async fn purge(
        &self,
        filter: EventPurgeFilter,
        dry_run: bool,
    ) -> Result<PhaseCounts, AppError> {
        let enriched_events = if dry_run {
            self.events.count_enriched(filter).await?
        } else {
            self.events.purge_enriched(filter).await?
        };

        let base_events = if dry_run {
            self.events.count_base(filter).await?
        } else {
            self.events.purge_base(filter).await?
        };

        Ok(PhaseCounts {
            base_events,
            enriched_events,
        })
    }
}
