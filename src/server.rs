//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::application::services::{
    AnalyticsPipeline, GeoEnrichmentWorker, GeoWorkerConfig, RedirectResolver, RetentionService,
};
use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::infrastructure::cache::{CacheConfig, ResolutionCache};
use crate::infrastructure::geo::{GeoLookup, MaxMindGeoProvider, NullGeoProvider};
use crate::infrastructure::persistence::{
    PgEventRepository, PgLinkRepository, PgRetentionRepository,
};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::clock::{Clock, SystemClock};

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Resolution cache
/// - GeoIP provider (or NullGeoProvider fallback)
/// - Background click worker and geo enrichment worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let cache = Arc::new(ResolutionCache::new(
        CacheConfig {
            ttl: chrono::Duration::seconds(config.cache_ttl_seconds as i64),
            max_entries: config.cache_max_entries,
            evict_batch: config.cache_evict_batch,
        },
        Arc::clone(&clock),
    ));

    let geo: Arc<dyn GeoLookup> = match &config.geoip_db_path {
        Some(path) => match MaxMindGeoProvider::open(path, config.geoip_asn_db_path.as_deref()) {
            Ok(provider) => {
                tracing::info!(path, "GeoIP lookup enabled");
                Arc::new(provider)
            }
            Err(e) => {
                tracing::warn!("Failed to open GeoIP database: {e}. Using NullGeoProvider.");
                Arc::new(NullGeoProvider)
            }
        },
        None => {
            tracing::info!("GeoIP lookup disabled (NullGeoProvider)");
            Arc::new(NullGeoProvider)
        }
    };

    let pool_arc = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(Arc::clone(&pool_arc)));
    let event_repository = Arc::new(PgEventRepository::new(Arc::clone(&pool_arc)));
    let retention_repository = Arc::new(PgRetentionRepository::new(Arc::clone(&pool_arc)));

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    tokio::spawn(run_click_worker(
        click_rx,
        event_repository.clone(),
        link_repository.clone(),
    ));
    tracing::info!("Click worker started");

    let analytics = Arc::new(AnalyticsPipeline::new(event_repository.clone(), click_tx));

    let resolver = Arc::new(RedirectResolver::new(
        Arc::clone(&cache),
        link_repository,
        analytics,
        Duration::from_millis(config.store_query_timeout_ms),
        Arc::clone(&clock),
    ));

    let retention = Arc::new(RetentionService::new(
        event_repository.clone(),
        retention_repository,
        config.retention_days,
        Arc::clone(&clock),
    ));

    let geo_worker = Arc::new(GeoEnrichmentWorker::new(
        event_repository,
        geo,
        GeoWorkerConfig {
            interval: Duration::from_secs(config.geo_worker_interval_seconds),
            batch_limit: config.geo_worker_batch_limit,
            dry_run: config.geo_worker_dry_run,
        },
    ));
    geo_worker.start();

    let state = AppState::new(
        resolver,
        retention,
        geo_worker,
        cache,
        config.behind_proxy,
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
