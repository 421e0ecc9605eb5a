//! HTTP request handlers.

pub mod geo_worker;
pub mod health;
pub mod redirect;
pub mod retention;

pub use geo_worker::{
    geo_worker_run_handler, geo_worker_start_handler, geo_worker_stats_handler,
    geo_worker_stop_handler,
};
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use retention::retention_run_handler;
