//! PostgreSQL implementation of the event repository.
//!
//! Covers both event tables plus the retention delete/count queries. Purge
//! predicates are built from [`EventPurgeFilter`] and bound as parameters;
//! the optional owner scope uses a `$n IS NULL OR ...` guard rather than
//! string-assembled SQL.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{
    BaseClickEvent, GeoBackfillRow, GeoUpdate, NewBaseClickEvent, NewEnrichedClickEvent,
};
use crate::domain::repositories::{EventPurgeFilter, EventRepository};
use crate::error::AppError;

/// PostgreSQL repository for base and enriched click events.
pub struct PgEventRepository {
    pool: Arc<PgPool>,
}

impl PgEventRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn insert_base(&self, new_event: NewBaseClickEvent) -> Result<BaseClickEvent, AppError> {
        let event = sqlx::query_as::<_, BaseClickEvent>(
            r#"
            INSERT INTO click_events (short_link_id)
            VALUES ($1)
            RETURNING id, short_link_id, occurred_at
            "#,
        )
        .bind(new_event.short_link_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(event)
    }

    async fn insert_enriched(&self, new_event: NewEnrichedClickEvent) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO click_analytics (
                base_event_id, short_link_id, occurred_at, ip_address,
                user_agent, referrer, device_type, browser, operating_system,
                utm_source, utm_medium, utm_campaign
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(new_event.base_event_id)
        .bind(new_event.short_link_id)
        .bind(new_event.occurred_at)
        .bind(new_event.ip_address)
        .bind(new_event.user_agent)
        .bind(new_event.referrer)
        .bind(new_event.device_type)
        .bind(new_event.browser)
        .bind(new_event.operating_system)
        .bind(new_event.utm_source)
        .bind(new_event.utm_medium)
        .bind(new_event.utm_campaign)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(id)
    }

    async fn geo_backfill_candidates(&self, limit: i64) -> Result<Vec<GeoBackfillRow>, AppError> {
        let rows = sqlx::query_as::<_, GeoBackfillRow>(
            r#"
            SELECT id, ip_address
            FROM click_analytics
            WHERE ip_address IS NOT NULL
              AND (country IS NULL OR city IS NULL)
            ORDER BY id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn apply_geo_update(&self, event_id: i64, update: GeoUpdate) -> Result<(), AppError> {
        // COALESCE keeps any already-populated column: fill-only-null.
        sqlx::query(
            r#"
            UPDATE click_analytics SET
                country   = COALESCE(country, $2),
                city      = COALESCE(city, $3),
                region    = COALESCE(region, $4),
                timezone  = COALESCE(timezone, $5),
                isp       = COALESCE(isp, $6),
                latitude  = COALESCE(latitude, $7),
                longitude = COALESCE(longitude, $8)
            WHERE id = $1
            "#,
        )
        .bind(event_id)
        .bind(update.country)
        .bind(update.city)
        .bind(update.region)
        .bind(update.timezone)
        .bind(update.isp)
        .bind(update.latitude)
        .bind(update.longitude)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn purge_base(&self, filter: EventPurgeFilter) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM click_events
            WHERE occurred_at < $1
              AND ($2::bigint IS NULL OR short_link_id IN (
                    SELECT id FROM short_links WHERE owner_id = $2))
            "#,
        )
        .bind(filter.cutoff)
        .bind(filter.owner_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn purge_enriched(&self, filter: EventPurgeFilter) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM click_analytics
            WHERE occurred_at < $1
              AND ($2::bigint IS NULL OR short_link_id IN (
                    SELECT id FROM short_links WHERE owner_id = $2))
            "#,
        )
        .bind(filter.cutoff)
        .bind(filter.owner_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn count_base(&self, filter: EventPurgeFilter) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM click_events
            WHERE occurred_at < $1
              AND ($2::bigint IS NULL OR short_link_id IN (
                    SELECT id FROM short_links WHERE owner_id = $2))
            "#,
        )
        .bind(filter.cutoff)
        .bind(filter.owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count as u64)
    }

    async fn count_enriched(&self, filter: EventPurgeFilter) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM click_analytics
            WHERE occurred_at < $1
              AND ($2::bigint IS NULL OR short_link_id IN (
                    SELECT id FROM short_links WHERE owner_id = $2))
            "#,
        )
        .bind(filter.cutoff)
        .bind(filter.owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count as u64)
    }
}
