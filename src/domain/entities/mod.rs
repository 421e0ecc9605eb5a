//! Core business data structures.

pub mod event;
pub mod link;
pub mod retention;

pub use event::{
    BaseClickEvent, EnrichedClickEvent, GeoBackfillRow, GeoUpdate, NewBaseClickEvent,
    NewEnrichedClickEvent,
};
pub use link::ShortLink;
pub use retention::RetentionOverride;
