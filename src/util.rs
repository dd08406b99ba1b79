//! Request helpers shared by the handlers.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Header carrying the admin secret.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Extract the admin secret from the `x-admin-token` header.
///
/// Returns None if the header is missing, not valid UTF-8, or empty after trimming.
pub fn extract_admin_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Resolve the client address for a request.
///
/// With `trust_proxy`, tries the first `x-forwarded-for` entry, then
/// `x-real-ip`. Falls back to the socket peer address.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> Option<String> {
    if trust_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }
    }

    peer.map(|addr| addr.ip().to_string())
}
