//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Request context captured for analytics
//! - [`click_worker`] - Asynchronous click-job processing worker
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves the redirect and returns the response
//! 2. The base click event is inserted synchronously (errors swallowed)
//! 3. [`click_worker::ClickJob`]s for enrichment and the hit counter are
//!    queued on a bounded channel
//! 4. [`click_worker::run_click_worker`] persists them best-effort via
//!    [`repositories::EventRepository`] and [`repositories::LinkRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
