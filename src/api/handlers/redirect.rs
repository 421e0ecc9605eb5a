//! Handler for short link redirect.

use axum::{
    extract::{ConnectInfo, Path, RawQuery, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::domain::click_event::ClickContext;
use crate::state::AppState;
use crate::utils::client_ip::extract_client_ip;
use crate::utils::utm::parse_utm;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Capture client context (IP, user agent, referrer, UTM parameters)
/// 2. Resolve the code (cache first, store fallback, validity checks)
/// 3. Return `302 Found` with the target URL
///
/// # Errors
///
/// - `404` - no such code
/// - `410` - expired, hit limit reached, or inactive
/// - `400` - malformed code (length/charset)
/// - `503` - link store unavailable
///
/// Analytics failures never change the response: the base event insert is
/// attempted before the redirect is written out, but its errors are logged
/// and swallowed inside the pipeline.
pub async fn redirect_handler(
    Path(code): Path<String>,
    RawQuery(query): RawQuery,
    State(state): State<AppState>,
    request: Request,
) -> Response {
    // The peer address lives in the request extensions when the server is
    // built with connect info; absent in tests, where it is optional anyway.
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let headers = request.headers();
    let ctx = ClickContext::new(
        extract_client_ip(headers, peer, state.behind_proxy),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
        parse_utm(query.as_deref()),
    );

    match state.resolver.resolve(&code, ctx).await {
        Ok(target_url) => (
            StatusCode::FOUND,
            [
                (header::LOCATION, target_url),
                (header::CACHE_CONTROL, "no-store".to_string()),
            ],
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
