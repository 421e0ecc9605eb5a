//! Client IP extraction.
//!
//! The peer socket address is authoritative unless the service is explicitly
//! configured as running behind a trusted reverse proxy, in which case the
//! usual forwarding headers are consulted first.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Resolves the client IP for a request.
///
/// With `behind_proxy` set, `X-Forwarded-For` (first hop) and `X-Real-IP`
/// take precedence over the socket peer address. Header values that do not
/// parse as IP addresses are ignored.
pub fn extract_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> Option<String> {
    if behind_proxy {
        if let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| v.parse::<std::net::IpAddr>().is_ok())
        {
            return Some(forwarded.to_string());
        }

        if let Some(real_ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| v.parse::<std::net::IpAddr>().is_ok())
        {
            return Some(real_ip.to_string());
        }
    }

    peer.map(|addr| addr.ip().to_string())
}
