//! Utility functions shared across the application.
//!
//! - [`clock`] - Injectable time source for deterministic tests
//! - [`user_agent`] - Heuristic device/browser/OS classification
//! - [`client_ip`] - Client IP resolution with proxy-header support
//! - [`utm`] - UTM campaign parameter extraction

pub mod client_ip;
pub mod clock;
pub mod user_agent;
pub mod utm;
