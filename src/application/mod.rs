//! Application layer orchestrating domain logic.
//!
//! Services compose repository traits, the resolution cache, and the geo
//! provider into the four operations this service exists for: resolving
//! redirects, recording clicks, backfilling geo data, and purging aged
//! events.

pub mod services;
