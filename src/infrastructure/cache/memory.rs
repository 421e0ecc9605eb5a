//! Bounded in-process resolution cache.
//!
//! TTL-based map from short code to a resolved link snapshot, sitting in
//! front of the persistent store on the read path. When the map exceeds its
//! configured size, a fixed-size batch of entries is evicted in insertion
//! order. This is deliberately not LRU: arbitrary batch eviction avoids
//! per-access bookkeeping on the hot path, trading hit precision for
//! throughput. Misses are never cached (no negative caching), so a transient
//! store error cannot poison the cache.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::ShortLink;
use crate::utils::clock::Clock;

/// Snapshot of link state captured at cache-insert time.
///
/// Validity fields (`active`, `expires_at`, hit-limit counters) are carried
/// in the snapshot and re-validated on every hit, so a link that expires or
/// is deactivated after caching is still refused within one TTL window.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub link_id: i64,
    pub target_url: String,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_hits: Option<i64>,
    pub hit_count: i64,
}

impl From<&ShortLink> for CacheEntry {
    fn from(link: &ShortLink) -> Self {
        Self {
            link_id: link.id,
            target_url: link.target_url.clone(),
            active: link.active,
            expires_at: link.expires_at,
            max_hits: link.max_hits,
            hit_count: link.hit_count,
        }
    }
}

struct Slot {
    entry: CacheEntry,
    inserted_at: DateTime<Utc>,
}

struct Inner {
    map: HashMap<String, Slot>,
    // Insertion order, used only when an eviction batch is needed. Keys left
    // behind by lazy TTL expiry are skipped when popped and compacted away
    // once the queue reaches twice the map bound, so it stays O(max_entries).
    order: VecDeque<String>,
}

/// Configuration for [`ResolutionCache`].
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
    pub evict_batch: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(5),
            max_entries: 500,
            evict_batch: 50,
        }
    }
}

/// Process-local cache from short code to resolved link snapshot.
///
/// Shared across concurrent redirect requests; mutation is serialized by a
/// single mutex. Critical sections are O(1) except eviction, which is bounded
/// by the batch size.
pub struct ResolutionCache {
    inner: Mutex<Inner>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl ResolutionCache {
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            config,
            clock,
        }
    }

    /// Looks up a code, lazily evicting the entry when past its TTL.
    pub fn get(&self, code: &str) -> Option<CacheEntry> {
        let now = self.clock.now();
        let mut inner = self.inner.lock().unwrap();

        let expired = match inner.map.get(code) {
            Some(slot) if now - slot.inserted_at < self.config.ttl => {
                return Some(slot.entry.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            inner.map.remove(code);
        }
        None
    }

    /// Inserts or overwrites an entry, evicting a batch when full.
    pub fn put(&self, code: &str, entry: CacheEntry) {
        let now = self.clock.now();
        let mut inner = self.inner.lock().unwrap();

        let is_new = !inner.map.contains_key(code);
        if is_new && inner.map.len() >= self.config.max_entries {
            let batch = self.config.evict_batch;
            let mut evicted = 0;
            while evicted < batch {
                let Some(victim) = inner.order.pop_front() else {
                    break;
                };
                if inner.map.remove(&victim).is_some() {
                    evicted += 1;
                }
            }
        }

        // Overwrites keep their original queue position; only new keys are
        // appended. Keys lazily expired out of the map can still pile up in
        // the queue, so compact once it reaches twice the map bound.
        if is_new {
            if inner.order.len() >= self.config.max_entries * 2 {
                let Inner { map, order } = &mut *inner;
                let mut seen = HashSet::with_capacity(map.len());
                order.retain(|k| map.contains_key(k) && seen.insert(k.clone()));
            }
            inner.order.push_back(code.to_string());
        }

        inner.map.insert(
            code.to_string(),
            Slot {
                entry,
                inserted_at: now,
            },
        );
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.map.clear();
        inner.order.clear();
    }
}
