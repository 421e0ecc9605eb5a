//! PostgreSQL repository implementations.

mod pg_event_repository;
mod pg_link_repository;
mod pg_retention_repository;

pub use pg_event_repository::PgEventRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_retention_repository::PgRetentionRepository;
