//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{GeoEnrichmentWorker, RedirectResolver, RetentionService};
use crate::infrastructure::cache::ResolutionCache;

/// Handler-visible application state.
///
/// Cheap to clone: everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RedirectResolver>,
    pub retention: Arc<RetentionService>,
    pub geo_worker: Arc<GeoEnrichmentWorker>,
    pub cache: Arc<ResolutionCache>,
    /// When true, client IPs are read from forwarding headers.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        resolver: Arc<RedirectResolver>,
        retention: Arc<RetentionService>,
        geo_worker: Arc<GeoEnrichmentWorker>,
        cache: Arc<ResolutionCache>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            resolver,
            retention,
            geo_worker,
            cache,
            behind_proxy,
        }
    }
}
