//! Infrastructure layer: persistence, caching, and external lookups.
//!
//! Implements the repository traits from [`crate::domain::repositories`]
//! against PostgreSQL, the in-process resolution cache, and the GeoIP
//! provider contract.

pub mod cache;
pub mod geo;
pub mod persistence;
