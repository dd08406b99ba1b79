//! Per-IP rate limiting.
//!
//! Keys are 128-bit random tokens, so the limit is there to blunt key
//! guessing and plain abuse, not to make guessing feasible-but-slow.
//!
//! Configure via `RATE_LIMIT_RPM` (default: 120, 0 disables).

use std::sync::Arc;
use std::time::Duration;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_governor::key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor};

/// Rate limiter keyed on the socket peer address.
pub type PeerRateLimitLayer = GovernorLayer<
    PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    axum::body::Body,
>;

/// Rate limiter keyed on forwarding headers, falling back to the peer address.
pub type ProxiedRateLimitLayer = GovernorLayer<
    SmartIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    axum::body::Body,
>;

/// Replenish one request every `60s / rpm`, allowing a full minute's burst.
fn replenish_period(requests_per_minute: u32) -> Duration {
    Duration::from_millis((60_000 / u64::from(requests_per_minute)).max(1))
}

/// Creates a layer keyed on the socket peer address.
/// Returns None when `requests_per_minute` is 0.
pub fn peer_layer(requests_per_minute: u32) -> Option<PeerRateLimitLayer> {
    if requests_per_minute == 0 {
        return None;
    }
    let config = GovernorConfigBuilder::default()
        .period(replenish_period(requests_per_minute))
        .burst_size(requests_per_minute)
        .finish()?;
    Some(GovernorLayer::new(Arc::new(config)))
}

/// Creates a layer keyed on `x-forwarded-for` / `x-real-ip` / `forwarded`.
/// Only use behind a trusted proxy. Returns None when `requests_per_minute` is 0.
pub fn proxied_layer(requests_per_minute: u32) -> Option<ProxiedRateLimitLayer> {
    if requests_per_minute == 0 {
        return None;
    }
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .period(replenish_period(requests_per_minute))
        .burst_size(requests_per_minute)
        .finish()?;
    Some(GovernorLayer::new(Arc::new(config)))
}
