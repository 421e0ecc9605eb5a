//! HTTP API layer: handlers, routes, and middleware.

pub mod handlers;
pub mod middleware;
pub mod routes;
