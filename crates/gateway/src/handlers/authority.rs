//! Authority binding handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{handlers::execute, AppState};
use citeledger_common::{
    auth::{parse_principal, CallerContext},
    errors::{AppError, Result},
    extract::ApiJson,
};
use citeledger_ledger::Principal;

#[derive(Debug, Deserialize)]
pub struct SetAuthorityRequest {
    pub principal: String,
}

#[derive(Serialize)]
pub struct AuthorityResponse {
    pub authority: Principal,
}

/// Bind the ledger authority (one-shot)
pub async fn set_authority(
    State(state): State<AppState>,
    ctx: CallerContext,
    ApiJson(request): ApiJson<SetAuthorityRequest>,
) -> Result<Json<AuthorityResponse>> {
    let principal = parse_principal(&request.principal).ok_or_else(|| AppError::Validation {
        message: "Principal must not be empty".to_string(),
        field: Some("principal".to_string()),
    })?;

    let bound = principal.clone();
    execute(&state, &ctx, "set_authority_contract", move |ledger, _inv| {
        ledger.set_authority_contract(bound)
    })
    .await?;

    Ok(Json(AuthorityResponse {
        authority: principal,
    }))
}
