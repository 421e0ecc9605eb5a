//! Process-local resolution cache.

mod memory;

pub use memory::{CacheConfig, CacheEntry, ResolutionCache};
