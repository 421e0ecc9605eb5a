//! Shared fixtures for handler tests.
//!
//! Handlers are exercised against in-memory repository stubs, so these tests
//! run without a database. Persistence itself is covered by the repository
//! layer.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;

use linkgate::application::services::{
    AnalyticsPipeline, GeoEnrichmentWorker, GeoWorkerConfig, RedirectResolver, RetentionService,
};
use linkgate::domain::click_worker::ClickJob;
use linkgate::domain::entities::{
    BaseClickEvent, GeoBackfillRow, GeoUpdate, NewBaseClickEvent, NewEnrichedClickEvent,
    RetentionOverride, ShortLink,
};
use linkgate::domain::repositories::{
    EventPurgeFilter, EventRepository, LinkRepository, RetentionRepository,
};
use linkgate::error::AppError;
use linkgate::infrastructure::cache::{CacheConfig, ResolutionCache};
use linkgate::infrastructure::geo::NullGeoProvider;
use linkgate::state::AppState;
use linkgate::utils::clock::{Clock, SystemClock};

/// In-memory link store.
pub struct StubLinkRepository {
    links: Mutex<Vec<ShortLink>>,
    pub increments: AtomicU64,
}

impl StubLinkRepository {
    pub fn new(links: Vec<ShortLink>) -> Self {
        Self {
            links: Mutex::new(links),
            increments: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl LinkRepository for StubLinkRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code)
            .cloned())
    }

    async fn increment_hit_count(&self, _link_id: i64) -> Result<(), AppError> {
        self.increments.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory event store counting writes; purges and counts report the
/// numbers it is seeded with.
pub struct StubEventRepository {
    next_id: AtomicI64,
    pub base_inserts: AtomicU64,
    pub enriched_inserts: AtomicU64,
    pub purgeable_base: u64,
    pub purgeable_enriched: u64,
}

impl StubEventRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            base_inserts: AtomicU64::new(0),
            enriched_inserts: AtomicU64::new(0),
            purgeable_base: 0,
            purgeable_enriched: 0,
        }
    }

    pub fn with_purgeable(base: u64, enriched: u64) -> Self {
        Self {
            purgeable_base: base,
            purgeable_enriched: enriched,
            ..Self::new()
        }
    }
}

#[async_trait]
impl EventRepository for StubEventRepository {
    async fn insert_base(&self, new_event: NewBaseClickEvent) -> Result<BaseClickEvent, AppError> {
        self.base_inserts.fetch_add(1, Ordering::SeqCst);
        Ok(BaseClickEvent {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            short_link_id: new_event.short_link_id,
            occurred_at: Utc::now(),
        })
    }

    async fn insert_enriched(&self, _new_event: NewEnrichedClickEvent) -> Result<i64, AppError> {
        self.enriched_inserts.fetch_add(1, Ordering::SeqCst);
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn geo_backfill_candidates(&self, _limit: i64) -> Result<Vec<GeoBackfillRow>, AppError> {
        Ok(Vec::new())
    }

    async fn apply_geo_update(&self, _event_id: i64, _update: GeoUpdate) -> Result<(), AppError> {
        Ok(())
    }

    async fn purge_base(&self, _filter: EventPurgeFilter) -> Result<u64, AppError> {
        Ok(self.purgeable_base)
    }

    async fn purge_enriched(&self, _filter: EventPurgeFilter) -> Result<u64, AppError> {
        Ok(self.purgeable_enriched)
    }

    async fn count_base(&self, _filter: EventPurgeFilter) -> Result<u64, AppError> {
        Ok(self.purgeable_base)
    }

    async fn count_enriched(&self, _filter: EventPurgeFilter) -> Result<u64, AppError> {
        Ok(self.purgeable_enriched)
    }
}

/// Fixed set of tenant overrides.
pub struct StubRetentionRepository {
    overrides: Vec<RetentionOverride>,
}

impl StubRetentionRepository {
    pub fn new(overrides: Vec<RetentionOverride>) -> Self {
        Self { overrides }
    }
}

#[async_trait]
impl RetentionRepository for StubRetentionRepository {
    async fn list_overrides(&self) -> Result<Vec<RetentionOverride>, AppError> {
        Ok(self.overrides.clone())
    }
}

/// A servable link with no expiry or hit limit.
pub fn test_link(id: i64, code: &str, target_url: &str) -> ShortLink {
    ShortLink {
        id,
        owner_id: 1,
        code: code.to_string(),
        target_url: target_url.to_string(),
        active: true,
        expires_at: None,
        max_hits: None,
        hit_count: 0,
        created_at: Utc::now(),
    }
}

/// Everything a handler test may want to inspect after the request.
pub struct TestContext {
    pub state: AppState,
    pub links: Arc<StubLinkRepository>,
    pub events: Arc<StubEventRepository>,
    /// Keeps the click queue open; jobs can be drained and asserted on.
    pub click_rx: mpsc::Receiver<ClickJob>,
}

/// Builds an [`AppState`] over in-memory stubs.
///
/// `retention_days` of zero leaves retention disabled, matching the default
/// deployment.
pub fn create_test_state(
    links: Vec<ShortLink>,
    events: Arc<StubEventRepository>,
    retention_days: u32,
    overrides: Vec<RetentionOverride>,
) -> TestContext {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache = Arc::new(ResolutionCache::new(
        CacheConfig::default(),
        Arc::clone(&clock),
    ));
    let links = Arc::new(StubLinkRepository::new(links));

    let (click_tx, click_rx) = mpsc::channel(64);
    let analytics = Arc::new(AnalyticsPipeline::new(events.clone(), click_tx));

    let resolver = Arc::new(RedirectResolver::new(
        Arc::clone(&cache),
        links.clone(),
        analytics,
        Duration::from_secs(1),
        Arc::clone(&clock),
    ));

    let retention = Arc::new(RetentionService::new(
        events.clone(),
        Arc::new(StubRetentionRepository::new(overrides)),
        retention_days,
        Arc::clone(&clock),
    ));

    let geo_worker = Arc::new(GeoEnrichmentWorker::new(
        events.clone(),
        Arc::new(NullGeoProvider),
        GeoWorkerConfig::default(),
    ));

    let state = AppState::new(resolver, retention, geo_worker, cache, false);

    TestContext {
        state,
        links,
        events,
        click_rx,
    }
}
