pub mod admin;
pub mod public;

use axum::{
    Router,
    http::{HeaderValue, header},
};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::RateLimitConfig;
use crate::rate_limit;
use crate::state::AppState;

/// Builds the full application: public and admin routes, per-IP rate
/// limiting, permissive CORS, security headers and request tracing.
///
/// Rate limiting keys on the socket peer address, so the server must be run
/// with `into_make_service_with_connect_info::<SocketAddr>()`. With
/// `trust_proxy` it keys on forwarding headers instead.
pub fn router(state: AppState, rate_limit: RateLimitConfig) -> Router {
    let mut app = Router::new()
        .merge(public::router())
        .merge(admin::router());

    if state.trust_proxy {
        if let Some(layer) = rate_limit::proxied_layer(rate_limit.requests_per_minute) {
            app = app.layer(layer);
        }
    } else if let Some(layer) = rate_limit::peer_layer(rate_limit.requests_per_minute) {
        app = app.layer(layer);
    }

    app.layer(SetResponseHeaderLayer::if_not_present(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("DENY"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    ))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
