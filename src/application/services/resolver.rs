//! Redirect resolver.
//!
//! Answers "what happens when code X is hit" as one deterministic decision:
//! cache lookup, store fallback under a bounded timeout, validity checks, and
//! analytics hand-off. Analytics never blocks or alters the decision beyond
//! the single awaited base-event insert inside the pipeline.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::application::services::AnalyticsPipeline;
use crate::domain::click_event::ClickContext;
use crate::domain::repositories::LinkRepository;
use crate::error::ResolveError;
use crate::infrastructure::cache::{CacheEntry, ResolutionCache};
use crate::utils::clock::Clock;

/// Codes longer than this are rejected before touching cache or store.
pub const MAX_CODE_LENGTH: usize = 64;

/// Resolves short codes to target URLs.
pub struct RedirectResolver {
    cache: Arc<ResolutionCache>,
    links: Arc<dyn LinkRepository>,
    analytics: Arc<AnalyticsPipeline>,
    store_timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl RedirectResolver {
    pub fn new(
        cache: Arc<ResolutionCache>,
        links: Arc<dyn LinkRepository>,
        analytics: Arc<AnalyticsPipeline>,
        store_timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            links,
            analytics,
            store_timeout,
            clock,
        }
    }

    /// Resolves a code and records the click on success.
    ///
    /// Validity fields are snapshotted into the cache entry and re-validated
    /// on every hit, so a link that expires or is deactivated after being
    /// cached is still refused.
    pub async fn resolve(&self, code: &str, ctx: ClickContext) -> Result<String, ResolveError> {
        if !is_valid_code(code) {
            return Err(ResolveError::Malformed);
        }

        let entry = match self.cache.get(code) {
            Some(entry) => {
                debug!(code, "Cache HIT");
                entry
            }
            None => {
                debug!(code, "Cache MISS");
                self.fetch_and_cache(code).await?
            }
        };

        let now = self.clock.now();
        if entry.expires_at.is_some_and(|e| now >= e) {
            return Err(ResolveError::Expired);
        }
        if entry.max_hits.is_some_and(|max| entry.hit_count >= max) {
            return Err(ResolveError::LimitReached);
        }
        if !entry.active {
            return Err(ResolveError::Inactive);
        }

        self.analytics.record(entry.link_id, code, ctx).await;

        Ok(entry.target_url)
    }

    /// Store fallback on cache miss, bounded by the configured timeout so a
    /// slow store degrades to a fast failure instead of an unbounded hang.
    /// Not-found codes are never cached (no negative caching).
    async fn fetch_and_cache(&self, code: &str) -> Result<CacheEntry, ResolveError> {
        let lookup = tokio::time::timeout(self.store_timeout, self.links.find_by_code(code));

        let link = match lookup.await {
            Err(_) => {
                warn!(code, "Link store lookup timed out");
                return Err(ResolveError::StoreUnavailable);
            }
            Ok(Err(e)) => {
                error!(code, "Link store lookup failed: {:?}", e);
                return Err(ResolveError::StoreUnavailable);
            }
            Ok(Ok(None)) => return Err(ResolveError::NotFound),
            Ok(Ok(Some(link))) => link,
        };

        let entry = CacheEntry::from(&link);
        self.cache.put(code, entry.clone());
        Ok(entry)
    }
}

fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LENGTH
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BaseClickEvent, ShortLink};
    use crate::domain::repositories::{MockEventRepository, MockLinkRepository};
    use crate::infrastructure::cache::CacheConfig;
    use crate::utils::clock::ManualClock;
    use chrono::{Duration as ChronoDuration, Utc};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn link(code: &str, target: &str) -> ShortLink {
        ShortLink {
            id: 1,
            owner_id: 10,
            code: code.to_string(),
            target_url: target.to_string(),
            active: true,
            expires_at: None,
            max_hits: None,
            hit_count: 0,
            created_at: Utc::now(),
        }
    }

    struct Fixture {
        clock: Arc<ManualClock>,
        cache: Arc<ResolutionCache>,
        // Keeps the click channel open so try_send does not observe a closed
        // queue; jobs are asserted through the mock expectations instead.
        _rx: mpsc::Receiver<crate::domain::click_worker::ClickJob>,
    }

    fn resolver_with(
        links: MockLinkRepository,
        events: MockEventRepository,
    ) -> (RedirectResolver, Fixture) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = Arc::new(ResolutionCache::new(CacheConfig::default(), clock.clone()));
        let (tx, _rx) = mpsc::channel(64);
        let analytics = Arc::new(AnalyticsPipeline::new(Arc::new(events), tx));
        let resolver = RedirectResolver::new(
            cache.clone(),
            Arc::new(links),
            analytics,
            Duration::from_millis(500),
            clock.clone(),
        );
        (resolver, Fixture { clock, cache, _rx })
    }

    fn events_expecting_base(times: usize) -> MockEventRepository {
        let mut events = MockEventRepository::new();
        events.expect_insert_base().times(times).returning(|e| {
            Ok(BaseClickEvent {
                id: 100,
                short_link_id: e.short_link_id,
                occurred_at: Utc::now(),
            })
        });
        events
    }

    #[tokio::test]
    async fn test_resolve_success_returns_stored_url() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(link("promo1", "https://example.com/sale"))));

        let (resolver, _fx) = resolver_with(links, events_expecting_base(1));

        let url = resolver
            .resolve("promo1", ClickContext::default())
            .await
            .unwrap();
        assert_eq!(url, "https://example.com/sale");
    }

    #[tokio::test]
    async fn test_second_resolve_served_from_cache() {
        let mut links = MockLinkRepository::new();
        // Exactly one store round trip despite two resolutions.
        links
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(link("promo1", "https://example.com/sale"))));

        let (resolver, _fx) = resolver_with(links, events_expecting_base(2));

        resolver
            .resolve("promo1", ClickContext::default())
            .await
            .unwrap();
        let url = resolver
            .resolve("promo1", ClickContext::default())
            .await
            .unwrap();
        assert_eq!(url, "https://example.com/sale");
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_code()
            .times(2)
            .returning(|_| Ok(None));

        let (resolver, fx) = resolver_with(links, events_expecting_base(0));

        let err = resolver
            .resolve("ghost", ClickContext::default())
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::NotFound);
        assert!(fx.cache.is_empty());

        // A second miss re-queries the store.
        let err = resolver
            .resolve("ghost", ClickContext::default())
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::NotFound);
    }

    #[tokio::test]
    async fn test_expired_link_refused() {
        let now = Utc::now();
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().returning(move |_| {
            Ok(Some(ShortLink {
                expires_at: Some(now - ChronoDuration::days(1)),
                ..link("old1", "https://example.com")
            }))
        });

        let (resolver, _fx) = resolver_with(links, events_expecting_base(0));

        let err = resolver
            .resolve("old1", ClickContext::default())
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::Expired);
    }

    #[tokio::test]
    async fn test_cached_entry_expires_between_hits() {
        let now = Utc::now();
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().times(1).returning(move |_| {
            Ok(Some(ShortLink {
                expires_at: Some(now + ChronoDuration::minutes(2)),
                ..link("soon", "https://example.com")
            }))
        });

        let (resolver, fx) = resolver_with(links, events_expecting_base(1));

        // Valid when cached.
        resolver
            .resolve("soon", ClickContext::default())
            .await
            .unwrap();

        // The stale-but-cached entry must still be re-validated at read time.
        fx.clock.advance(ChronoDuration::minutes(3));
        let err = resolver
            .resolve("soon", ClickContext::default())
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::Expired);
    }

    #[tokio::test]
    async fn test_hit_limit_reached() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().returning(|_| {
            Ok(Some(ShortLink {
                max_hits: Some(10),
                hit_count: 10,
                ..link("capped", "https://example.com")
            }))
        });

        let (resolver, _fx) = resolver_with(links, events_expecting_base(0));

        let err = resolver
            .resolve("capped", ClickContext::default())
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::LimitReached);
    }

    #[tokio::test]
    async fn test_inactive_link_refused() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().returning(|_| {
            Ok(Some(ShortLink {
                active: false,
                ..link("off", "https://example.com")
            }))
        });

        let (resolver, _fx) = resolver_with(links, events_expecting_base(0));

        let err = resolver
            .resolve("off", ClickContext::default())
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::Inactive);
    }

    #[tokio::test]
    async fn test_malformed_code_rejected_without_store_access() {
        let links = MockLinkRepository::new(); // no expectations: must not be called
        let (resolver, _fx) = resolver_with(links, events_expecting_base(0));

        let too_long = "x".repeat(MAX_CODE_LENGTH + 1);
        assert_eq!(
            resolver
                .resolve(&too_long, ClickContext::default())
                .await
                .unwrap_err(),
            ResolveError::Malformed
        );
        assert_eq!(
            resolver
                .resolve("bad/char", ClickContext::default())
                .await
                .unwrap_err(),
            ResolveError::Malformed
        );
        assert_eq!(
            resolver
                .resolve("", ClickContext::default())
                .await
                .unwrap_err(),
            ResolveError::Malformed
        );
    }

    #[tokio::test]
    async fn test_store_error_maps_to_unavailable() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_code()
            .returning(|_| Err(crate::error::AppError::internal("down", json!({}))));

        let (resolver, _fx) = resolver_with(links, events_expecting_base(0));

        let err = resolver
            .resolve("promo1", ClickContext::default())
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::StoreUnavailable);
    }

    #[tokio::test]
    async fn test_analytics_failure_does_not_affect_redirect() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_code()
            .returning(|_| Ok(Some(link("promo1", "https://example.com/sale"))));

        let mut events = MockEventRepository::new();
        events
            .expect_insert_base()
            .returning(|_| Err(crate::error::AppError::internal("sink down", json!({}))));

        let (resolver, _fx) = resolver_with(links, events);

        let url = resolver
            .resolve("promo1", ClickContext::default())
            .await
            .unwrap();
        assert_eq!(url, "https://example.com/sale");
    }

    #[test]
    fn test_code_validation() {
        assert!(is_valid_code("abc-DEF_123"));
        assert!(!is_valid_code("has space"));
        assert!(!is_valid_code("émoji"));
        assert!(is_valid_code(&"x".repeat(MAX_CODE_LENGTH)));
        assert!(!is_valid_code(&"x".repeat(MAX_CODE_LENGTH + 1)));
    }
}
