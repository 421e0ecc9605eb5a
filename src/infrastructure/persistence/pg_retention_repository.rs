//! PostgreSQL implementation of the retention-override repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::RetentionOverride;
use crate::domain::repositories::RetentionRepository;
use crate::error::AppError;

/// PostgreSQL repository for tenant retention overrides.
pub struct PgRetentionRepository {
    pool: Arc<PgPool>,
}

impl PgRetentionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RetentionRepository for PgRetentionRepository {
    async fn list_overrides(&self) -> Result<Vec<RetentionOverride>, AppError> {
        let overrides = sqlx::query_as::<_, RetentionOverride>(
            "SELECT owner_id, retention_days FROM retention_overrides ORDER BY owner_id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(overrides)
    }
}
