//! Short link entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A stored mapping from a compact code to a destination URL.
///
/// A link is servable iff it is active, `expires_at` is unset or in the
/// future, and `max_hits` is unset or `hit_count` is still below it.
/// `hit_count` is mutated only by the analytics pipeline; `active` is flipped
/// by the (out of scope) link-management collaborator.
#[derive(Debug, Clone, FromRow)]
pub struct ShortLink {
    pub id: i64,
    pub owner_id: i64,
    pub code: String,
    pub target_url: String,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_hits: Option<i64>,
    pub hit_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// Returns true if the configured hit limit has been reached.
    pub fn hit_limit_reached(&self) -> bool {
        self.max_hits.is_some_and(|max| self.hit_count >= max)
    }
}
