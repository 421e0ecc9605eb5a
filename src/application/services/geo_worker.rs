//! Geo enrichment background worker.
//!
//! Ticks on a fixed interval, batching analytics rows whose geo fields are
//! still null and backfilling them through the geo provider. A row the
//! provider cannot resolve is simply skipped and picked up again on a later
//! tick; there is no retry-count tracking. The worker is independently
//! startable and stoppable, and the stop signal halts scheduling of further
//! ticks without interrupting an in-flight batch.

use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::entities::GeoUpdate;
use crate::domain::repositories::EventRepository;
use crate::error::AppError;
use crate::infrastructure::geo::GeoLookup;

/// Worker tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct GeoWorkerConfig {
    pub interval: Duration,
    pub batch_limit: i64,
    /// When set, ticks scan and look up but never persist.
    pub dry_run: bool,
}

impl Default for GeoWorkerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            batch_limit: 100,
            dry_run: false,
        }
    }
}

/// Point-in-time worker counters, also the `stats` endpoint response body.
#[derive(Debug, Clone, Serialize)]
pub struct GeoWorkerStats {
    pub running: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub total_scanned: u64,
    pub total_updated: u64,
    pub runs: u64,
}

/// Outcome of a single backfill pass.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BackfillOutcome {
    pub scanned: u64,
    pub updated: u64,
    pub dry_run: bool,
}

/// Periodic geo backfill worker.
pub struct GeoEnrichmentWorker {
    events: Arc<dyn EventRepository>,
    geo: Arc<dyn GeoLookup>,
    config: GeoWorkerConfig,
    running: AtomicBool,
    total_scanned: AtomicU64,
    total_updated: AtomicU64,
    runs: AtomicU64,
    last_run: Mutex<Option<DateTime<Utc>>>,
    stop_tx: Mutex<Option<watch::Sender<bool>>>,
}

impl GeoEnrichmentWorker {
    pub fn new(
        events: Arc<dyn EventRepository>,
        geo: Arc<dyn GeoLookup>,
        config: GeoWorkerConfig,
    ) -> Self {
        Self {
            events,
            geo,
            config,
            running: AtomicBool::new(false),
            total_scanned: AtomicU64::new(0),
            total_updated: AtomicU64::new(0),
            runs: AtomicU64::new(0),
            last_run: Mutex::new(None),
            stop_tx: Mutex::new(None),
        }
    }

    /// Starts the scheduling loop. Returns `false` when already running.
    pub fn start(self: &Arc<Self>) -> bool {
        if self.running.swap(true, Ordering::SeqCst) {
            return false;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        *self.stop_tx.lock().unwrap() = Some(stop_tx);

        let worker = Arc::clone(self);
        tokio::spawn(async move {
            info!(
                interval_secs = worker.config.interval.as_secs(),
                batch_limit = worker.config.batch_limit,
                dry_run = worker.config.dry_run,
                "Geo enrichment worker started"
            );

            let mut ticker = tokio::time::interval(worker.config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick fires immediately; that gives one
            // catch-up pass right after boot.
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = worker.run_once(worker.config.dry_run).await {
                            warn!("Geo backfill pass failed: {:?}", e);
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            worker.running.store(false, Ordering::SeqCst);
            info!("Geo enrichment worker stopped");
        });

        true
    }

    /// Signals the loop to stop after any in-flight batch. Returns `false`
    /// when the worker was not running.
    pub fn stop(&self) -> bool {
        let stop_tx = self.stop_tx.lock().unwrap().take();
        match stop_tx {
            Some(tx) => tx.send(true).is_ok(),
            None => false,
        }
    }

    /// Runs a single backfill pass.
    ///
    /// Rows whose IP fails to parse or resolve are skipped; they stay
    /// candidates for the next pass. In dry-run mode the scan and lookups
    /// happen but nothing is persisted.
    pub async fn run_once(&self, dry_run: bool) -> Result<BackfillOutcome, AppError> {
        let candidates = self
            .events
            .geo_backfill_candidates(self.config.batch_limit)
            .await?;

        let mut scanned = 0u64;
        let mut updated = 0u64;

        for row in candidates {
            scanned += 1;

            let Ok(ip) = row.ip_address.parse::<IpAddr>() else {
                debug!(event_id = row.id, ip = %row.ip_address, "Unparseable IP, skipping");
                continue;
            };

            let Some(info) = self.geo.lookup(ip) else {
                continue;
            };

            if dry_run {
                updated += 1;
                continue;
            }

            let update = GeoUpdate {
                country: info.country,
                city: info.city,
                region: info.region,
                timezone: info.timezone,
                isp: info.isp,
                latitude: info.latitude,
                longitude: info.longitude,
            };

            match self.events.apply_geo_update(row.id, update).await {
                Ok(()) => updated += 1,
                Err(e) => {
                    // Row remains a candidate on the next tick.
                    warn!(event_id = row.id, "Geo update failed: {:?}", e);
                }
            }
        }

        self.total_scanned.fetch_add(scanned, Ordering::Relaxed);
        self.total_updated.fetch_add(updated, Ordering::Relaxed);
        self.runs.fetch_add(1, Ordering::Relaxed);
        *self.last_run.lock().unwrap() = Some(Utc::now());

        debug!(scanned, updated, dry_run, "Geo backfill pass finished");

        Ok(BackfillOutcome {
            scanned,
            updated,
            dry_run,
        })
    }

    /// Snapshot of the worker counters.
    pub fn stats(&self) -> GeoWorkerStats {
        GeoWorkerStats {
            running: self.running.load(Ordering::SeqCst),
            last_run: *self.last_run.lock().unwrap(),
            total_scanned: self.total_scanned.load(Ordering::Relaxed),
            total_updated: self.total_updated.load(Ordering::Relaxed),
            runs: self.runs.load(Ordering::Relaxed),
        }
    }
}
