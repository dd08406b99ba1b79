use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extractors::{JsonBody, Query};
use crate::models::{CreateLicense, License};
use crate::state::AppState;
use crate::util::extract_admin_token;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
    pub created: bool,
    pub license: License,
}

/// POST /create
///
/// Admin secret comes from the `x-admin-token` header, or the `adminToken`
/// body field when the header is absent. A duplicate key answers 409 with
/// `created: false` (see [`AppError::Conflict`](crate::error::AppError::Conflict)).
pub async fn create_license(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(input): JsonBody<CreateLicense>,
) -> Result<Json<CreateResponse>> {
    let token = extract_admin_token(&headers)
        .map(str::to_string)
        .or_else(|| input.admin_token.clone());

    let license = state.service.create(token.as_deref(), input)?;

    Ok(Json(CreateResponse {
        created: true,
        license,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "adminToken", alias = "admin_token", default)]
    pub admin_token: Option<String>,
}

/// GET /list
///
/// Returns every record verbatim, keys included. Admin secret comes from the
/// `x-admin-token` header or the `adminToken` query parameter.
pub async fn list_licenses(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<License>>> {
    let token = extract_admin_token(&headers).or(query.admin_token.as_deref());
    let licenses = state.service.list(token)?;
    Ok(Json(licenses))
}
