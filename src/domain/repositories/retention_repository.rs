//! Repository trait for per-tenant retention overrides.

use crate::domain::entities::RetentionOverride;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only access to tenant retention overrides.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRetentionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RetentionRepository: Send + Sync {
    /// Lists all configured overrides.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_overrides(&self) -> Result<Vec<RetentionOverride>, AppError>;
}
