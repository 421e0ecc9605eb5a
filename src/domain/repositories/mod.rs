//! Data access trait definitions.
//!
//! Repository traits define the contracts implemented by the infrastructure
//! layer. Services depend on these traits only, which keeps the hot path and
//! the background jobs testable with mocks.

pub mod event_repository;
pub mod link_repository;
pub mod retention_repository;

pub use event_repository::{EventPurgeFilter, EventRepository};
pub use link_repository::LinkRepository;
pub use retention_repository::RetentionRepository;

#[cfg(test)]
pub use event_repository::MockEventRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use retention_repository::MockRetentionRepository;
