use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extractors::{JsonBody, PeerAddr};
use crate::models::{SubmittedKey, VerifyRequest};
use crate::service::{InvalidReason, Verification};
use crate::state::AppState;
use crate::util::client_ip;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Address the license is bound to (IP mismatch only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_ip: Option<String>,
    /// Address the request was checked against (IP mismatch only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_ip: Option<String>,
}

impl From<Verification> for VerifyResponse {
    fn from(verification: Verification) -> Self {
        match verification {
            Verification::Valid { owner } => Self {
                valid: true,
                owner: Some(owner),
                reason: None,
                authorized_ip: None,
                observed_ip: None,
            },
            Verification::Invalid(reason) => {
                let message = reason.message().to_string();
                let (authorized_ip, observed_ip) = match reason {
                    InvalidReason::IpNotAuthorized {
                        authorized_ip,
                        observed_ip,
                    } => (Some(authorized_ip), Some(observed_ip)),
                    _ => (None, None),
                };
                Self {
                    valid: false,
                    owner: None,
                    reason: Some(message),
                    authorized_ip,
                    observed_ip,
                }
            }
        }
    }
}

/// POST /verify
///
/// Always answers 200 with `valid: true|false`; a missing, unknown or
/// non-string key is reported in `reason`, not as an HTTP error. The `ip`
/// field overrides the connection's source address.
pub async fn verify_license(
    State(state): State<AppState>,
    PeerAddr(peer): PeerAddr,
    headers: HeaderMap,
    JsonBody(req): JsonBody<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let ip = req
        .ip
        .filter(|ip| !ip.is_empty())
        .or_else(|| client_ip(&headers, peer, state.trust_proxy));

    let verification = match req.key {
        SubmittedKey::NotText => {
            tracing::debug!("Verify: non-string key");
            Verification::Invalid(InvalidReason::NotFound)
        }
        key => state.service.verify(key.as_text(), ip.as_deref())?,
    };

    Ok(Json(verification.into()))
}
