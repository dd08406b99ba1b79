mod licenses;

pub use licenses::*;

use axum::{routing::{get, post}, Router};

use crate::state::AppState;

/// Operator endpoints. Each handler checks the admin secret itself because
/// create also accepts it in the request body.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_license))
        .route("/list", get(list_licenses))
        // Legacy paths from earlier clients
        .route("/crear", post(create_license))
        .route("/listar", get(list_licenses))
}
