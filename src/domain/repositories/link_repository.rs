//! Repository trait for short link data access.

use crate::domain::entities::ShortLink;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the read side of redirect resolution plus the
/// denormalized hit counter.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its short code.
    ///
    /// Matches by code alone, without pre-filtering on validity, so the
    /// resolver can distinguish an inactive link from a missing one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Increments the link's hit counter by one.
    ///
    /// Eventually consistent by contract: a lost increment under failure is
    /// tolerated, there is no transactional linkage to the event inserts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_hit_count(&self, link_id: i64) -> Result<(), AppError>;
}
