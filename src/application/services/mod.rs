//! Business logic services.

pub mod analytics;
pub mod geo_worker;
pub mod resolver;
pub mod retention;

pub use analytics::AnalyticsPipeline;
pub use geo_worker::{BackfillOutcome, GeoEnrichmentWorker, GeoWorkerConfig, GeoWorkerStats};
pub use resolver::RedirectResolver;
pub use retention::{RetentionError, RetentionReport, RetentionService};
