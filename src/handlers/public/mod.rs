mod verify;

pub use verify::*;

use axum::{routing::{get, post}, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Plain-text liveness message served at `/`.
pub const ALIVE_MESSAGE: &str = "license service running";

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn root() -> &'static str {
    ALIVE_MESSAGE
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/verify", post(verify_license))
        // Legacy paths from earlier clients
        .route("/verificar", post(verify_license))
        .route("/api/verify", post(verify_license))
}
